//! # Path Query Engine
//!
//! Resolves dot-delimited path patterns against JSON-shaped trees:
//! - Key access, positional access and the `*` wildcard
//! - Fan-out over sequences, keeping one entry per element
//! - Bracketed conditions built from comparison pairs and `&&`, `||`, `!`
//! - Results borrowed from the caller's tree as [`Match`]es

pub mod ast;
pub mod builder;
pub mod coerce;
pub(crate) mod common;
pub mod condition;
pub mod parser;
pub mod traverse;

/// Caller-supplied comparison used by the `?` operator. It receives the
/// resolved left value (`None` when the field is missing) and the trimmed
/// right-hand literal.
pub type Predicate<'f> = dyn Fn(Option<&Match<'_>>, &str) -> bool + 'f;

// Re-exports
pub use ast::*;
pub use builder::Query;
pub use common::Match;
pub use condition::{Comparison, Condition, Operator};
pub use parser::*;
pub use traverse::PathTraverser;
