use std::io::{BufRead, Write};

use anyhow::Context;
use graph_reach_core::{is_valid_name, MAX_NAME_LEN};
use thiserror::Error;

/// Token that ends the session without querying.
pub const QUIT: &str = "quit";

pub const PROMPT: &str = "Enter origin and destination (quit to exit): ";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Quit,
    Path { src: String, dest: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("expected an origin and a destination")]
    MissingName,

    #[error("'{0}' is not a valid node name (at most {max} characters)", max = MAX_NAME_LEN)]
    InvalidName(String),
}

impl Query {
    /// Build a path query, validating both names.
    pub fn path(src: &str, dest: &str) -> Result<Self, InputError> {
        for name in [src, dest] {
            if !is_valid_name(name) {
                return Err(InputError::InvalidName(name.to_string()));
            }
        }
        Ok(Query::Path {
            src: src.to_string(),
            dest: dest.to_string(),
        })
    }
}

/// Parse one input line: `quit`, or two whitespace-separated names.
/// Tokens after the second are ignored.
pub fn parse_query(line: &str) -> Result<Query, InputError> {
    let mut tokens = line.split_whitespace();
    let src = tokens.next().ok_or(InputError::MissingName)?;
    if src == QUIT {
        return Ok(Query::Quit);
    }
    let dest = tokens.next().ok_or(InputError::MissingName)?;
    Query::path(src, dest)
}

/// Print the prompt and read one query. End of input counts as `quit`.
pub fn read_query<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<Query> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("cannot read input")? == 0 {
        return Ok(Query::Quit);
    }
    Ok(parse_query(&line)?)
}
