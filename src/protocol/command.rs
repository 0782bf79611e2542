//! Command definitions
//!
//! The five SSSP verbs and their wire tokens.

use std::fmt;

/// A protocol command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Scan a single file by path
    ScanFile,

    /// Scan a directory
    ScanDir,

    /// Scan a directory recursively
    ScanDirr,

    /// Scan a streamed payload of declared length
    ScanData,

    /// End the session
    Quit,
}

impl Command {
    /// The wire token for this command
    pub fn token(self) -> &'static str {
        match self {
            Command::ScanFile => "SCANFILE",
            Command::ScanDir => "SCANDIR",
            Command::ScanDirr => "SCANDIRR",
            Command::ScanData => "SCANDATA",
            Command::Quit => "BYE",
        }
    }

    /// Render a path-targeted request line
    pub fn with_path(self, path: &str) -> String {
        format!("{} {}", self.token(), path)
    }

    /// Render a streamed-payload request line carrying the declared length
    pub fn with_length(self, len: u64) -> String {
        format!("{} {}", self.token(), len)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
