//! # sssp
//!
//! A client for the SSSP protocol spoken by SAVDI malware-scanning daemons:
//! - Connects over TCP or Unix-domain sockets with bounded retry
//! - Greeting/version handshake before any command
//! - File, directory (optionally recursive) and raw stream submission
//! - Typed results with nested-archive attribution and per-item failures
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Client Facade                            │
//! │      scan_file / scan_dir / scan_stream / close              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Protocol Layer                              │
//! │   handshake · command encoding · response state machine      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Line Transport                              │
//! │   CRLF framing · raw payload copy · scoped deadlines         │
//! │            (TCP or Unix-domain stream)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sssp::{Client, Config};
//!
//! fn main() -> sssp::Result<()> {
//!     let config = Config::builder()
//!         .tcp("127.0.0.1:4010")
//!         .build();
//!     let mut client = Client::connect(config)?;
//!     let result = client.scan_file("/tmp/suspect.bin")?;
//!     if result.infected {
//!         println!("{} -> {}", result.target, result.signature);
//!     }
//!     client.close()?;
//!     Ok(())
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod transport;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SsspError};
pub use config::{Config, ConfigBuilder, DEFAULT_SOCKET};
pub use transport::TransportKind;
pub use protocol::{Command, ScanResult};
pub use client::{Client, ScanSource};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the sssp crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
