//! Line-oriented transport
//!
//! Frames the protocol as CRLF-terminated text lines over a buffered
//! stream, with raw byte writes for payload upload. All I/O inside a
//! command exchange runs under the per-command deadline, applied
//! immediately before each operation and cleared immediately after.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::time::Duration;

use crate::error::Result;
use super::{Deadline, Stream};

/// Buffered reader/writer over the raw connection
#[derive(Debug)]
pub struct LineTransport {
    /// Stream reader (buffered for efficiency)
    reader: BufReader<Stream>,

    /// Stream writer (buffered for efficiency)
    writer: BufWriter<Stream>,

    /// Deadline applied to every operation within an exchange
    cmd_timeout: Duration,
}

impl LineTransport {
    /// Wrap a connected stream.
    ///
    /// The stream is cloned into separate read and write handles; deadlines
    /// are socket-level and therefore cover both halves.
    pub fn new(stream: Stream, cmd_timeout: Duration) -> Result<Self> {
        let read_half = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(stream),
            cmd_timeout,
        })
    }

    /// Replace the per-command deadline used by future exchanges
    pub fn set_cmd_timeout(&mut self, timeout: Duration) {
        self.cmd_timeout = timeout;
    }

    /// Begin a logical request/response exchange.
    ///
    /// The returned slot scopes the per-command deadline: each operation on
    /// it applies the deadline first, and dropping the slot clears any
    /// deadline left on the connection.
    pub fn begin(&mut self) -> Exchange<'_> {
        Exchange { transport: self }
    }

    /// Shut down the underlying connection
    pub fn shutdown(&self) -> Result<()> {
        self.writer.get_ref().shutdown()?;
        Ok(())
    }

    fn apply_deadline(&self) -> io::Result<()> {
        self.writer
            .get_ref()
            .set_deadline(Deadline::after(self.cmd_timeout))
    }

    fn clear_deadline(&self) -> io::Result<()> {
        self.writer.get_ref().set_deadline(Deadline::NONE)
    }
}

/// One request/response slot on the transport.
///
/// Operations apply the deadline before touching the socket and clear it
/// right after, so a deadline never leaks into an unrelated later operation.
#[derive(Debug)]
pub struct Exchange<'a> {
    transport: &'a mut LineTransport,
}

impl Exchange<'_> {
    /// Write one CRLF-terminated line and flush
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        tracing::trace!(">> {}", line);
        self.with_deadline(|t| {
            t.writer.write_all(line.as_bytes())?;
            t.writer.write_all(b"\r\n")?;
            t.writer.flush()
        })
    }

    /// Copy exactly `len` raw bytes from `src` to the connection, then flush.
    ///
    /// A source that ends before `len` bytes would desynchronize the
    /// protocol and is reported as an unexpected EOF.
    pub fn copy_raw<R: Read + ?Sized>(&mut self, src: &mut R, len: u64) -> Result<()> {
        self.with_deadline(|t| {
            let copied = io::copy(&mut (&mut *src).take(len), &mut t.writer)?;
            if copied != len {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("payload source ended after {} of {} bytes", copied, len),
                ));
            }
            t.writer.flush()
        })
    }

    /// Read one line, stripping the trailing CRLF.
    ///
    /// A closed connection is reported as an unexpected EOF.
    pub fn read_line(&mut self) -> Result<String> {
        let line = self.with_deadline(|t| {
            let mut buf = Vec::new();
            let n = t.reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                ));
            }
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })?;
        tracing::trace!("<< {}", line);
        Ok(line)
    }

    /// Run one I/O operation under the per-command deadline
    fn with_deadline<T>(
        &mut self,
        op: impl FnOnce(&mut LineTransport) -> io::Result<T>,
    ) -> Result<T> {
        self.transport.apply_deadline()?;
        let outcome = op(self.transport);
        let cleared = self.transport.clear_deadline();
        let value = outcome?;
        cleared?;
        Ok(value)
    }
}

impl Drop for Exchange<'_> {
    fn drop(&mut self) {
        // The deadline must not outlive the exchange even on an error path.
        let _ = self.transport.clear_deadline();
    }
}
