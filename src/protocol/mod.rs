//! Protocol Module
//!
//! The SSSP wire protocol: CRLF-terminated ASCII control lines with raw
//! byte payload upload for streamed scans.
//!
//! ## Exchange Shape
//!
//! ```text
//! C: SCANDIR /tmp/scan
//! S: ACC 0DF7F71B/SCANDIR
//! S: FAIL 0210 /tmp/scan/bad.eml
//! S: VIRUS EICAR-AV-Test /tmp/scan/a.tar.bz2/Bzip2/a.txt
//! S: OK 0 /tmp/scan/a.tar.bz2
//! S: DONE OK 0000 The function call succeeded
//! S:
//! ```
//!
//! ## Tokens (case-sensitive, line-prefix matched)
//! - `OK`    - greeting / per-item success
//! - `ACC`   - acknowledgement (protocol chatter)
//! - `FAIL`  - per-item failure
//! - `DONE`  - terminal marker, optionally ` OK` or ` FAIL <message>`
//! - `VIRUS` - infection report, `VIRUS <signature> [<member>]`

mod command;
mod response;
mod parser;
mod handshake;

pub use command::Command;
pub use response::ScanResult;
pub use parser::{parse_multi, parse_single, LineSource};
pub use handshake::handshake;

/// Greeting and per-item success token
pub const OK_RESP: &str = "OK";

/// Acknowledgement token
pub const ACK_RESP: &str = "ACC";

/// Per-item failure token
pub const FAIL_RESP: &str = "FAIL";

/// Terminal marker token
pub const DONE_RESP: &str = "DONE";

/// Terminal-failure variant of the terminal marker
pub const DONE_FAIL: &str = "DONE FAIL";

/// Infection report token
pub const VIRUS_RESP: &str = "VIRUS";

/// Protocol identifier sent during version negotiation
pub const PROTOCOL_VERSION: &str = "SSSP/1.0";

/// Logical target name used for streamed submissions
pub const STREAM_TARGET: &str = "stream";
