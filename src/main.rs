/*!
Main binary for jpath.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use jpath::input::{Format, parse_document};
use jpath::query::{Match, Query};
use jpath::{commands, utils};

/// Filter a document with a jpath pattern, e.g. "store.books[price<10].title".
#[derive(Parser)]
#[command(name = "jp", version, about, arg_required_else_help = true, long_about = None, disable_help_subcommand = true)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path pattern (e.g., "items[price>10].name")
    pattern: Option<String>,
    #[arg(value_name = "FILE")]
    /// Optional path to the input document. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Input format; guessed from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<Format>,
    /// Print each match as compact, uncolored JSON
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Display count of number of matches
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    /// Display depth of the input document
    #[arg(long, action = ArgAction::SetTrue)]
    depth: bool,
    /// Do not display matched values
    #[arg(short, long, action = ArgAction::SetTrue)]
    no_display: bool,
    /// Compare strings that look like dates as points in time
    #[arg(long, action = ArgAction::SetTrue)]
    dates: bool,
    /// Only display the first match
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["last", "eq"])]
    first: bool,
    /// Only display the last match
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "eq")]
    last: bool,
    /// Only display the match at this 0-based position
    #[arg(long, value_name = "INDEX")]
    eq: Option<usize>,
    #[command(flatten)]
    verbosity: Verbosity,
}

/// Available subcommands for `jp`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate man pages to the output directory if specified, else the
    /// current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Entry point for main binary.
///
/// Reads the document from FILE (memory-mapped) or STDIN, runs the pattern,
/// and prints the matches to STDOUT.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    match args.command {
        Some(Commands::Generate(GenerateCommand::Shell { shell })) => {
            commands::generate::write_completions(
                &mut Args::command(),
                shell,
                &mut io::stdout().lock(),
            );
            Ok(())
        }
        Some(Commands::Generate(GenerateCommand::Man { output_dir })) => {
            for path in
                commands::generate::write_man_pages(&Args::command(), output_dir)?
            {
                println!("Generated: {}", path.display());
            }
            Ok(())
        }
        None => run(&args),
    }
}

/// Runs the pattern in `args` against the input document.
fn run(args: &Args) -> Result<()> {
    let pattern = args.pattern.as_deref().ok_or_else(|| {
        anyhow::anyhow!("Pattern required unless using subcommand")
    })?;

    let document = if let Some(path) = &args.input {
        let file = File::open(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        // SAFETY: the mapping is only read while the file stays open, and
        // the document is copied out before it is dropped.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map file {}", path.display()))?;
        let format = args.format.unwrap_or_else(|| Format::from_path(path));
        parse_document(&mmap, format)?
    } else {
        if io::stdin().is_terminal() {
            // No piped input and no file specified
            let mut cmd = Args::command();
            return Ok(cmd.print_help()?);
        }
        let mut buffer = vec![];
        io::stdin().read_to_end(&mut buffer)?;
        parse_document(&buffer, args.format.unwrap_or_default())?
    };

    let mut query = Query::new(&document);
    query
        .dates(args.dates)
        .select(pattern)
        .with_context(|| format!("Failed to run pattern `{pattern}`"))?;

    let shown: Vec<&Match<'_>> = if args.first {
        query.first().into_iter().collect()
    } else if args.last {
        query.last().into_iter().collect()
    } else if let Some(index) = args.eq {
        query.eq(index).into_iter().collect()
    } else {
        query.val().iter().collect()
    };

    if args.count {
        println!("Found matches: {}", query.val().len());
    }

    if args.depth {
        println!("Depth: {}", jpath::depth(&document));
    }

    if !args.no_display {
        let mut out = io::stdout().lock();
        for found in shown {
            utils::write_match(&mut out, found, args.compact)?;
        }
        out.flush().or_else(|err| {
            if err.kind() == io::ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(err)
            }
        })?;
    }

    Ok(())
}
