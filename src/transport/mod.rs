//! Transport Module
//!
//! Connection establishment and line-oriented framing over TCP or
//! Unix-domain byte streams.
//!
//! ## Architecture
//! - `Stream`: the raw byte-stream connection
//! - `dial`: bounded-retry connection establishment
//! - `LineTransport` / `Exchange`: CRLF framing with scoped deadlines

mod stream;
mod dial;
mod line;

pub use stream::{Deadline, Stream};
pub use dial::dial;
pub use line::{Exchange, LineTransport};

use std::fmt;
use std::str::FromStr;

use crate::error::SsspError;

/// Supported transport kinds for reaching the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Unix-domain stream socket
    Unix,
    /// Unix-domain sequential-packet socket
    UnixPacket,
    /// TCP, either address family
    Tcp,
    /// TCP, IPv4 only
    Tcp4,
    /// TCP, IPv6 only
    Tcp6,
}

impl TransportKind {
    /// Whether this kind addresses a filesystem socket path
    pub fn is_unix(self) -> bool {
        matches!(self, TransportKind::Unix | TransportKind::UnixPacket)
    }

    /// The configuration string naming this kind
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Unix => "unix",
            TransportKind::UnixPacket => "unixpacket",
            TransportKind::Tcp => "tcp",
            TransportKind::Tcp4 => "tcp4",
            TransportKind::Tcp6 => "tcp6",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = SsspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(TransportKind::Unix),
            "unixpacket" => Ok(TransportKind::UnixPacket),
            "tcp" => Ok(TransportKind::Tcp),
            "tcp4" => Ok(TransportKind::Tcp4),
            "tcp6" => Ok(TransportKind::Tcp6),
            other => Err(SsspError::UnsupportedTransport(other.to_string())),
        }
    }
}
