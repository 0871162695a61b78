//! Process exit codes.
//!
//! - 0: a result was printed, or the user quit
//! - 1: a queried node name does not exist in the graph
//! - 2: usage or configuration error (bad flags, unreadable graph file, malformed input)

use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    NodeNotFound = 1,
    Usage = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}
