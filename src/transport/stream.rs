//! Byte-stream connection
//!
//! Wraps the concrete socket types behind one `Read + Write` stream and
//! models I/O deadlines as an explicit optional value.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::time::Duration;

/// An I/O deadline for a single operation.
///
/// `Deadline::NONE` means no deadline. A zero duration is treated as no
/// deadline as well, so a cleared or unset timeout can never reach the
/// socket as `Some(0)`, which the standard library rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Duration>);

impl Deadline {
    /// No deadline
    pub const NONE: Deadline = Deadline(None);

    /// Deadline expiring `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        if timeout.is_zero() {
            Deadline(None)
        } else {
            Deadline(Some(timeout))
        }
    }

    /// The remaining timeout, `None` when no deadline applies
    pub fn timeout(self) -> Option<Duration> {
        self.0
    }
}

/// A connected byte stream to the daemon
#[derive(Debug)]
pub enum Stream {
    /// TCP connection
    Tcp(TcpStream),
    /// Unix-domain connection
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Stream {
    /// Clone the underlying socket handle.
    ///
    /// Both handles refer to the same socket, so deadlines set through one
    /// apply to the other.
    pub fn try_clone(&self) -> io::Result<Stream> {
        match self {
            Stream::Tcp(s) => s.try_clone().map(Stream::Tcp),
            #[cfg(unix)]
            Stream::Unix(s) => s.try_clone().map(Stream::Unix),
        }
    }

    /// Apply a deadline to both reads and writes
    pub fn set_deadline(&self, deadline: Deadline) -> io::Result<()> {
        let timeout = deadline.timeout();
        match self {
            Stream::Tcp(s) => {
                s.set_read_timeout(timeout)?;
                s.set_write_timeout(timeout)
            }
            #[cfg(unix)]
            Stream::Unix(s) => {
                s.set_read_timeout(timeout)?;
                s.set_write_timeout(timeout)
            }
        }
    }

    /// Shut down both directions of the connection
    pub fn shutdown(&self) -> io::Result<()> {
        match self {
            Stream::Tcp(s) => s.shutdown(Shutdown::Both),
            #[cfg(unix)]
            Stream::Unix(s) => s.shutdown(Shutdown::Both),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(s) => s.read(buf),
            #[cfg(unix)]
            Stream::Unix(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(s) => s.write(buf),
            #[cfg(unix)]
            Stream::Unix(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::Tcp(s) => s.flush(),
            #[cfg(unix)]
            Stream::Unix(s) => s.flush(),
        }
    }
}
