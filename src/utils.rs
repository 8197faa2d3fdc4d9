//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::Colorize;
use serde_json::Value;
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::query::Match;

/// Returns the depth of the JSON value.
#[must_use]
pub fn depth(json: &Value) -> usize {
    match json {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => 1,
        Value::Array(arr) => 1 + arr.iter().map(depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
    }
}

// ==============================================================================
// Result Output
// ==============================================================================

/// Write a single match to `writer`, colorized unless `compact`, followed by a
/// newline. Silently returns `Ok(())` on broken pipe so that piping to tools
/// like `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_match<W: Write>(
    writer: &mut W,
    found: &Match<'_>,
    compact: bool,
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        if compact {
            let json = serde_json::to_string(found)?;
            writeln!(writer, "{json}")
        } else {
            match found {
                Match::Node(value) => write_colored_json(writer, value, 0)?,
                Match::Group(_) => {
                    write_colored_json(writer, &found.to_value(), 0)?;
                }
            }
            writeln!(writer)
        }
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write match to stdout"),
    }
}

/// Recursively write a pretty-printed JSON value with syntax highlighting.
fn write_colored_json<W: Write>(
    writer: &mut W,
    value: &Value,
    indent: usize,
) -> io::Result<()> {
    let next_indent = indent + 2;

    match value {
        Value::Null => write!(writer, "{}", "null".red().dimmed()),
        Value::Bool(b) => write!(writer, "{}", b.to_string().yellow().bold()),
        Value::Number(n) => write!(writer, "{}", n.to_string().yellow()),
        // Re-serialize for JSON escaping and quoting
        Value::String(s) => {
            write!(writer, "{}", Value::String(s.clone()).to_string().green())
        }
        Value::Array(arr) => {
            write!(writer, "[")?;
            for (i, item) in arr.iter().enumerate() {
                write!(writer, "\n{:width$}", "", width = next_indent)?;
                write_colored_json(writer, item, next_indent)?;
                if i + 1 < arr.len() {
                    write!(writer, ",")?;
                }
            }
            if !arr.is_empty() {
                write!(writer, "\n{:width$}", "", width = indent)?;
            }
            write!(writer, "]")
        }
        Value::Object(obj) => {
            write!(writer, "{{")?;
            for (i, (key, val)) in obj.iter().enumerate() {
                write!(writer, "\n{:width$}", "", width = next_indent)?;
                let quoted_key = Value::String(key.clone()).to_string();
                write!(writer, "{}: ", quoted_key.cyan())?;
                write_colored_json(writer, val, next_indent)?;
                if i + 1 < obj.len() {
                    write!(writer, ",")?;
                }
            }
            if !obj.is_empty() {
                write!(writer, "\n{:width$}", "", width = indent)?;
            }
            write!(writer, "}}")
        }
    }
}
