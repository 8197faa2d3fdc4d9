//! Subcommands of the `jp` binary that do not run a query.
pub mod generate;
