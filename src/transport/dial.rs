//! Connection establishment
//!
//! Dials the daemon with a bounded retry loop: timeout-classified failures
//! are retried after a fixed sleep, anything else aborts immediately.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::{Result, SsspError};
use super::{Stream, TransportKind};

/// Connect to the daemon.
///
/// Makes up to `retries + 1` attempts, sleeping `retry_sleep` between
/// attempts that failed on a timeout. Non-timeout failures are not assumed
/// transient and abort the loop. For Unix kinds the socket path must exist
/// before the first attempt.
pub fn dial(
    kind: TransportKind,
    address: &str,
    connect_timeout: Duration,
    retries: u32,
    retry_sleep: Duration,
) -> Result<Stream> {
    if kind.is_unix() && !Path::new(address).exists() {
        return Err(SsspError::SocketNotFound(address.to_string()));
    }

    tracing::debug!("Dialing {} {}", kind, address);

    let mut attempt = 0;
    loop {
        match dial_once(kind, address, connect_timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) if is_timeout(&e) && attempt < retries => {
                attempt += 1;
                tracing::debug!(
                    "Connect attempt {} to {} timed out, retrying in {:?}",
                    attempt,
                    address,
                    retry_sleep
                );
                thread::sleep(retry_sleep);
            }
            Err(e) => {
                return Err(SsspError::Connect {
                    address: address.to_string(),
                    source: e,
                })
            }
        }
    }
}

/// One connection attempt
fn dial_once(kind: TransportKind, address: &str, connect_timeout: Duration) -> io::Result<Stream> {
    match kind {
        // SOCK_SEQPACKET listeners are reached through the stream-socket API;
        // the standard library has no sequential-packet type.
        #[cfg(unix)]
        TransportKind::Unix | TransportKind::UnixPacket => {
            UnixStream::connect(address).map(Stream::Unix)
        }
        #[cfg(not(unix))]
        TransportKind::Unix | TransportKind::UnixPacket => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "unix sockets are not available on this platform",
        )),
        TransportKind::Tcp | TransportKind::Tcp4 | TransportKind::Tcp6 => {
            let addr = resolve(kind, address)?;
            let stream = TcpStream::connect_timeout(&addr, connect_timeout)?;
            // Disable Nagle's algorithm for low latency
            stream.set_nodelay(true)?;
            Ok(Stream::Tcp(stream))
        }
    }
}

/// Resolve a `host:port` address, honoring the address family the kind pins
fn resolve(kind: TransportKind, address: &str) -> io::Result<SocketAddr> {
    let wanted = |addr: &SocketAddr| match kind {
        TransportKind::Tcp4 => addr.is_ipv4(),
        TransportKind::Tcp6 => addr.is_ipv6(),
        _ => true,
    };

    address
        .to_socket_addrs()?
        .find(wanted)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no {} address found for {}", kind, address),
            )
        })
}

/// Whether a connect failure is timeout-classified and therefore retryable
fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
