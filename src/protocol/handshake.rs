//! Handshake sequencing
//!
//! The two-step greeting and version negotiation that must complete before
//! any command may be issued.

use crate::error::{Result, SsspError};
use crate::transport::LineTransport;

use super::{ACK_RESP, OK_RESP, PROTOCOL_VERSION};

/// Perform the handshake on a freshly dialed connection.
///
/// Step 1 reads the greeting, which must begin with `OK`. Step 2 sends the
/// protocol identifier and reads the reply, which must begin with `ACC`.
/// Runs exactly once per connection; on failure the connection must be
/// discarded.
pub fn handshake(transport: &mut LineTransport) -> Result<()> {
    {
        let mut exchange = transport.begin();
        let line = exchange.read_line()?;
        if !line.starts_with(OK_RESP) {
            return Err(SsspError::Greeting(line));
        }
    }

    let mut exchange = transport.begin();
    exchange.send_line(PROTOCOL_VERSION)?;
    let line = exchange.read_line()?;
    if !line.starts_with(ACK_RESP) {
        return Err(SsspError::Ack(line));
    }

    tracing::debug!("Handshake complete, negotiated {}", PROTOCOL_VERSION);
    Ok(())
}
