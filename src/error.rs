//! Error types for the SSSP client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::protocol::ScanResult;

/// Result type alias using SsspError
pub type Result<T> = std::result::Result<T, SsspError>;

/// Unified error type for SSSP client operations
#[derive(Debug, Error)]
pub enum SsspError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Protocol: {0} is not supported")]
    UnsupportedTransport(String),

    #[error("The unix socket: {0} does not exist")]
    SocketNotFound(String),

    // -------------------------------------------------------------------------
    // Connect Errors
    // -------------------------------------------------------------------------
    #[error("Connection to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Handshake Errors
    // -------------------------------------------------------------------------
    #[error("Greeting failed: {0}")]
    Greeting(String),

    #[error("Ack failed: {0}")]
    Ack(String),

    // -------------------------------------------------------------------------
    // Protocol-content Errors
    // -------------------------------------------------------------------------
    /// Server reported a terminal failure; the payload is the server's
    /// diagnostic text exactly as sent after `DONE FAIL`.
    #[error("{0}")]
    ServerFailure(String),

    #[error("Virus match failure: {0}")]
    MalformedVirusLine(String),

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    // -------------------------------------------------------------------------
    // Stream Input Errors
    // -------------------------------------------------------------------------
    #[error("Scanning directories is not supported")]
    StreamDirectory,

    #[error("The content length could not be determined")]
    UnknownContentLength,

    // -------------------------------------------------------------------------
    // Exchange Errors Carrying Partial Results
    // -------------------------------------------------------------------------
    /// A scan exchange failed part-way through. `source` is the underlying
    /// error (an I/O error takes precedence over protocol-content errors) and
    /// `results` holds whatever was parsed before the failure. Partial results
    /// may still be valid and should be inspected by the caller.
    #[error("{source}")]
    Scan {
        #[source]
        source: Box<SsspError>,
        results: Vec<ScanResult>,
    },
}

impl SsspError {
    /// Wrap an error from a scan exchange together with the partial results
    /// parsed before the failure.
    pub(crate) fn scan(source: SsspError, results: Vec<ScanResult>) -> Self {
        SsspError::Scan {
            source: Box::new(source),
            results,
        }
    }

    /// Partial results carried by a failed scan exchange, empty for every
    /// other error.
    pub fn partial_results(&self) -> &[ScanResult] {
        match self {
            SsspError::Scan { results, .. } => results,
            _ => &[],
        }
    }
}
