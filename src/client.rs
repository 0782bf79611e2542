//! Client Facade
//!
//! Composes dialing, handshake, command encoding and response parsing into
//! the public scan operations.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, SsspError};
use crate::protocol::{
    handshake, parse_multi, parse_single, Command, ScanResult, STREAM_TARGET,
};
use crate::transport::{dial, LineTransport};

/// A source for streamed payload submission.
///
/// The closed set of supported variants is exactly what the protocol needs:
/// a source whose content length is known up front. A reader without a
/// declared length is rejected before the server is contacted.
pub enum ScanSource<'a> {
    /// In-memory buffer; the length is its size
    Bytes(&'a [u8]),

    /// Open file; the length is queried from its metadata
    File(&'a mut File),

    /// Arbitrary reader with a caller-declared remaining length
    Reader {
        reader: &'a mut dyn Read,
        len: Option<u64>,
    },
}

impl ScanSource<'_> {
    /// The content length to declare on the wire
    fn len(&self) -> Result<u64> {
        match self {
            ScanSource::Bytes(bytes) => Ok(bytes.len() as u64),
            ScanSource::File(file) => Ok(file.metadata()?.len()),
            ScanSource::Reader { len, .. } => len.ok_or(SsspError::UnknownContentLength),
        }
    }
}

/// An SSSP client session.
///
/// Owns exactly one connection to the daemon. Commands execute strictly
/// sequentially; the protocol has no pipelining. Every operation takes
/// `&mut self`, so a session cannot be used from two threads at once.
/// Give each worker its own session, or serialize access with an external
/// mutex.
#[derive(Debug)]
pub struct Client {
    config: Config,
    transport: LineTransport,
}

impl Client {
    /// Dial the daemon and complete the handshake.
    ///
    /// The connection is ready for any number of sequential command
    /// exchanges once this returns.
    pub fn connect(config: Config) -> Result<Self> {
        let transport = Self::establish(&config)?;
        Ok(Self { config, transport })
    }

    /// Re-establish a connection dropped by the daemon, e.g. on inactivity.
    ///
    /// The previous connection is discarded regardless of its state.
    pub fn redial(&mut self) -> Result<()> {
        self.transport = Self::establish(&self.config)?;
        Ok(())
    }

    fn establish(config: &Config) -> Result<LineTransport> {
        let stream = dial(
            config.transport,
            &config.address,
            config.connect_timeout,
            config.connect_retries,
            config.retry_sleep,
        )?;
        let mut transport = LineTransport::new(stream, config.cmd_timeout)?;

        match handshake(&mut transport) {
            Ok(()) => Ok(transport),
            Err(e) => {
                let _ = transport.shutdown();
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scan Operations
    // -------------------------------------------------------------------------

    /// Submit a single file for scanning
    pub fn scan_file(&mut self, path: impl AsRef<Path>) -> Result<ScanResult> {
        let target = path.as_ref().to_string_lossy().into_owned();
        tracing::debug!("Scanning file {}", target);

        let mut exchange = self.transport.begin();
        exchange.send_line(&Command::ScanFile.with_path(&target))?;
        parse_single(&mut exchange, &target)
    }

    /// Submit a directory for scanning, optionally recursing into
    /// subdirectories.
    ///
    /// Results arrive in server enumeration order, which is preserved.
    pub fn scan_dir(&mut self, path: impl AsRef<Path>, recursive: bool) -> Result<Vec<ScanResult>> {
        let target = path.as_ref().to_string_lossy().into_owned();
        let command = if recursive {
            Command::ScanDirr
        } else {
            Command::ScanDir
        };
        tracing::debug!("Scanning directory {} ({})", target, command);

        let mut exchange = self.transport.begin();
        exchange.send_line(&command.with_path(&target))?;
        parse_multi(&mut exchange)
    }

    /// Submit a file's contents via a stream.
    ///
    /// The path must exist and must not be a directory. The result's target
    /// is the literal `"stream"`.
    pub fn scan_stream(&mut self, path: impl AsRef<Path>) -> Result<ScanResult> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;
        if meta.is_dir() {
            return Err(SsspError::StreamDirectory);
        }

        let mut file = File::open(path)?;
        self.scan_source(ScanSource::File(&mut file))
    }

    /// Submit an in-memory buffer via a stream
    pub fn scan_bytes(&mut self, bytes: &[u8]) -> Result<ScanResult> {
        self.scan_source(ScanSource::Bytes(bytes))
    }

    /// Submit a payload source via a stream.
    ///
    /// The declared content length is resolved before the server is
    /// contacted; a source without one fails with
    /// [`SsspError::UnknownContentLength`].
    pub fn scan_source(&mut self, mut source: ScanSource<'_>) -> Result<ScanResult> {
        let len = source.len()?;
        tracing::debug!("Scanning {} byte stream", len);

        let mut exchange = self.transport.begin();
        exchange.send_line(&Command::ScanData.with_length(len))?;
        match &mut source {
            ScanSource::Bytes(bytes) => {
                let mut cursor = *bytes;
                exchange.copy_raw(&mut cursor, len)?;
            }
            ScanSource::File(file) => exchange.copy_raw(*file, len)?,
            ScanSource::Reader { reader, .. } => exchange.copy_raw(*reader, len)?,
        }
        parse_single(&mut exchange, STREAM_TARGET)
    }

    /// End the session.
    ///
    /// Attempts the quit exchange first, then shuts the connection down
    /// regardless of the quit outcome. A quit error takes precedence over a
    /// shutdown error.
    pub fn close(mut self) -> Result<()> {
        let quit = self.basic_cmd(Command::Quit).map(|_| ());
        let shutdown = self.transport.shutdown();
        quit.and(shutdown)
    }

    /// Issue a bare command expecting a single-line reply
    fn basic_cmd(&mut self, command: Command) -> Result<String> {
        let mut exchange = self.transport.begin();
        exchange.send_line(command.token())?;
        exchange.read_line()
    }

    // -------------------------------------------------------------------------
    // Configuration Setters
    // -------------------------------------------------------------------------

    /// Set the per-command I/O deadline. A zero value is ignored so a
    /// caller cannot disable the deadline entirely.
    pub fn set_cmd_timeout(&mut self, timeout: Duration) {
        if !timeout.is_zero() {
            self.config.cmd_timeout = timeout;
            self.transport.set_cmd_timeout(timeout);
        }
    }

    /// Set the sleep between connect retries used by [`redial`](Self::redial).
    /// A zero value is ignored.
    pub fn set_retry_sleep(&mut self, sleep: Duration) {
        if !sleep.is_zero() {
            self.config.retry_sleep = sleep;
        }
    }
}
