//! Response parsing state machine
//!
//! Segments the line stream of one exchange into typed results. Two modes
//! exist: single-target (SCANFILE, SCANDATA) producing one result, and
//! multi-target (SCANDIR, SCANDIRR) producing a list.
//!
//! Error precedence: an I/O error always wins over a protocol-content
//! error captured earlier in the same exchange. Either way the error
//! carries whatever results were parsed before the failure.

use crate::error::{Result, SsspError};
use crate::transport::Exchange;

use super::{ScanResult, ACK_RESP, DONE_FAIL, DONE_RESP, FAIL_RESP, OK_RESP, VIRUS_RESP};

/// A source of protocol lines for one exchange.
///
/// Abstracted from the transport so the state machine can be driven from
/// scripted line vectors in tests.
pub trait LineSource {
    /// The next line, without its terminator. A closed connection is an
    /// unexpected-EOF I/O error.
    fn next_line(&mut self) -> Result<String>;
}

impl LineSource for Exchange<'_> {
    fn next_line(&mut self) -> Result<String> {
        self.read_line()
    }
}

/// Shape of a line that begins with the infection-report token
enum VirusLine {
    /// `VIRUS <signature> [<member>]`
    Report { signature: String, member: String },
    /// Starts with the token but is not a valid report
    Malformed,
    /// Does not begin with the token
    Other,
}

fn classify_virus_line(line: &str) -> VirusLine {
    if !line.starts_with(VIRUS_RESP) {
        return VirusLine::Other;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts[0] != VIRUS_RESP || !(2..=3).contains(&parts.len()) {
        return VirusLine::Malformed;
    }

    VirusLine::Report {
        signature: parts[1].to_string(),
        member: parts.get(2).copied().unwrap_or_default().to_string(),
    }
}

/// The message carried by a `DONE FAIL` line: the marker and at most one
/// leading space stripped, preserved verbatim otherwise
fn terminal_failure_message(line: &str) -> String {
    let rest = line.strip_prefix(DONE_FAIL).unwrap_or(line);
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}

/// Consume a single-target exchange.
///
/// Reads lines until the empty-line sentinel. Only the first infection
/// report is retained; acknowledgement chatter is skipped; a `DONE FAIL`
/// message or malformed report is held as a pending error and returned
/// once the exchange has drained, together with the result parsed so far.
pub fn parse_single<L: LineSource>(lines: &mut L, target: &str) -> Result<ScanResult> {
    let mut result = ScanResult::clean(target);
    let mut pending: Option<SsspError> = None;

    loop {
        let line = match lines.next_line() {
            Ok(line) => line,
            Err(e) => return Err(SsspError::scan(e, vec![result])),
        };

        if line.starts_with(ACK_RESP) {
            continue;
        }

        if line.starts_with(DONE_RESP) {
            if line.starts_with(DONE_FAIL) {
                pending = Some(SsspError::ServerFailure(terminal_failure_message(&line)));
            }
            continue;
        }

        if line.is_empty() {
            break;
        }

        // Only the first infection match is retained.
        if !result.signature.is_empty() {
            continue;
        }

        match classify_virus_line(&line) {
            VirusLine::Report { signature, member } => {
                // A member equal to the requested target is the top-level
                // file itself, not a nested container entry.
                if member != result.target {
                    result.archive_member = member;
                }
                result.infected = true;
                result.signature = signature;
                result.raw_line = line;
            }
            VirusLine::Malformed => {
                pending = Some(SsspError::MalformedVirusLine(line));
            }
            VirusLine::Other => {}
        }
    }

    match pending {
        Some(e) => Err(SsspError::scan(e, vec![result])),
        None => Ok(result),
    }
}

/// Consume a multi-target exchange.
///
/// Each `FAIL` line and each `VIRUS ... OK` sequence starts a new result;
/// arrival order is preserved. Per-item lines must split (on single spaces)
/// into exactly 3 fields, the third being the item's path; a mismatch still
/// appends a result with whatever target could be extracted and holds an
/// invalid-response error for the exchange.
pub fn parse_multi<L: LineSource>(lines: &mut L) -> Result<Vec<ScanResult>> {
    let mut results: Vec<ScanResult> = Vec::new();
    let mut pending: Option<SsspError> = None;

    loop {
        let line = match lines.next_line() {
            Ok(line) => line,
            Err(e) => return Err(SsspError::scan(e, results)),
        };

        if line.starts_with(ACK_RESP) {
            continue;
        }

        if line.starts_with(DONE_RESP) {
            if line.starts_with(DONE_FAIL) {
                pending = Some(SsspError::ServerFailure(terminal_failure_message(&line)));
            }
            continue;
        }

        if line.is_empty() {
            break;
        }

        if line.starts_with(FAIL_RESP) {
            let mut item = ScanResult {
                failed: true,
                ..ScanResult::default()
            };
            let parts: Vec<&str> = line.split(' ').collect();
            if parts.len() != 3 {
                pending = Some(SsspError::InvalidResponse(line.clone()));
            } else {
                item.target = parts[2].to_string();
            }
            item.raw_line = line;
            results.push(item);
            continue;
        }

        match classify_virus_line(&line) {
            VirusLine::Report { signature, member } => {
                let mut item = ScanResult {
                    infected: true,
                    signature,
                    // Provisional: the trailing token is only an
                    // archive-member candidate until the success line
                    // names the authoritative target.
                    archive_member: member,
                    raw_line: line,
                    ..ScanResult::default()
                };

                // Drain further infection lines for the same item until the
                // success line that closes it.
                loop {
                    let line = match lines.next_line() {
                        Ok(line) => line,
                        Err(e) => return Err(SsspError::scan(e, results)),
                    };

                    if line.starts_with(VIRUS_RESP) {
                        continue;
                    }

                    if line.starts_with(OK_RESP) {
                        let parts: Vec<&str> = line.split(' ').collect();
                        if parts.len() != 3 {
                            pending = Some(SsspError::InvalidResponse(line));
                        } else {
                            item.target = parts[2].to_string();
                            // Some server variants repeat the filename on
                            // the VIRUS line; that is not a nested entry.
                            if item.archive_member == item.target {
                                item.archive_member.clear();
                            }
                        }
                        break;
                    }
                }

                results.push(item);
            }
            VirusLine::Malformed => {
                pending = Some(SsspError::MalformedVirusLine(line));
            }
            VirusLine::Other => {}
        }
    }

    match pending {
        Some(e) => Err(SsspError::scan(e, results)),
        None => Ok(results),
    }
}
