//! Protocol Tests
//!
//! Tests for command encoding and the response-parsing state machine,
//! driven from scripted line sources.

use std::io;

use sssp::protocol::{parse_multi, parse_single, LineSource};
use sssp::{Command, ScanResult, SsspError};

/// Replays a fixed list of protocol lines, then reports the connection as
/// closed.
struct ScriptSource {
    lines: std::vec::IntoIter<String>,
}

impl ScriptSource {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl LineSource for ScriptSource {
    fn next_line(&mut self) -> sssp::Result<String> {
        self.lines.next().ok_or_else(|| {
            SsspError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            ))
        })
    }
}

fn unwrap_scan(err: SsspError) -> (SsspError, Vec<ScanResult>) {
    match err {
        SsspError::Scan { source, results } => (*source, results),
        other => panic!("expected Scan error, got {:?}", other),
    }
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_command_tokens() {
    let table = [
        (Command::ScanFile, "SCANFILE"),
        (Command::ScanDir, "SCANDIR"),
        (Command::ScanDirr, "SCANDIRR"),
        (Command::ScanData, "SCANDATA"),
        (Command::Quit, "BYE"),
    ];

    for (command, token) in table {
        assert_eq!(command.token(), token);
        assert_eq!(command.to_string(), token);
    }
}

#[test]
fn test_command_path_line() {
    assert_eq!(
        Command::ScanFile.with_path("/tmp/a.txt"),
        "SCANFILE /tmp/a.txt"
    );
    assert_eq!(Command::ScanDirr.with_path("/srv/mail"), "SCANDIRR /srv/mail");
}

#[test]
fn test_command_length_line() {
    assert_eq!(Command::ScanData.with_length(1024), "SCANDATA 1024");
}

// =============================================================================
// Single-target Mode Tests
// =============================================================================

#[test]
fn test_single_clean_exchange() {
    let mut lines = ScriptSource::new(&["ACC 1F2E/SCANFILE", "DONE OK 0000 scan ok", ""]);
    let result = parse_single(&mut lines, "/tmp/clean.txt").unwrap();

    assert_eq!(result.target, "/tmp/clean.txt");
    assert!(!result.infected);
    assert!(!result.failed);
    assert_eq!(result.signature, "");
    assert_eq!(result.archive_member, "");
    assert!(result.is_clean());
}

#[test]
fn test_single_infected_top_level() {
    let mut lines = ScriptSource::new(&[
        "ACC SCANFILE",
        "VIRUS EICAR-AV-Test /tmp/a.txt",
        "",
    ]);
    let result = parse_single(&mut lines, "/tmp/a.txt").unwrap();

    assert_eq!(result.target, "/tmp/a.txt");
    assert!(result.infected);
    assert_eq!(result.signature, "EICAR-AV-Test");
    // The member names the requested file itself, not a nested entry.
    assert_eq!(result.archive_member, "");
    assert_eq!(result.raw_line, "VIRUS EICAR-AV-Test /tmp/a.txt");
}

#[test]
fn test_single_infected_archive_member() {
    let mut lines = ScriptSource::new(&[
        "ACC SCANFILE",
        "VIRUS EICAR-AV-Test /tmp/a.tar.bz2/Bzip2/a.txt",
        "DONE OK",
        "",
    ]);
    let result = parse_single(&mut lines, "/tmp/a.tar.bz2").unwrap();

    assert!(result.infected);
    assert_eq!(result.archive_member, "/tmp/a.tar.bz2/Bzip2/a.txt");
}

#[test]
fn test_single_member_token_optional() {
    let mut lines = ScriptSource::new(&["VIRUS EICAR-AV-Test", ""]);
    let result = parse_single(&mut lines, "stream").unwrap();

    assert!(result.infected);
    assert_eq!(result.signature, "EICAR-AV-Test");
    assert_eq!(result.archive_member, "");
}

#[test]
fn test_single_keeps_first_infection_only() {
    let mut lines = ScriptSource::new(&[
        "VIRUS First-Sig /tmp/a.zip/one",
        "VIRUS Second-Sig /tmp/a.zip/two",
        "",
    ]);
    let result = parse_single(&mut lines, "/tmp/a.zip").unwrap();

    assert_eq!(result.signature, "First-Sig");
    assert_eq!(result.archive_member, "/tmp/a.zip/one");
}

#[test]
fn test_single_malformed_virus_line() {
    let mut lines = ScriptSource::new(&["ACC SCANFILE", "VIRUS", ""]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();
    let (source, results) = unwrap_scan(err);

    assert_eq!(source.to_string(), "Virus match failure: VIRUS");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].target, "/tmp/a.txt");
    assert!(!results[0].infected);
}

#[test]
fn test_single_virus_line_with_extra_tokens_is_malformed() {
    let mut lines = ScriptSource::new(&["VIRUS Sig /tmp/a.txt trailing", ""]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();
    let (source, _) = unwrap_scan(err);

    assert!(matches!(source, SsspError::MalformedVirusLine(_)));
}

#[test]
fn test_single_done_fail_message_roundtrip() {
    let mut lines = ScriptSource::new(&["ACC SCANFILE", "DONE FAIL 0500 internal error", ""]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();

    // The server's diagnostic text must round-trip exactly.
    assert_eq!(err.to_string(), "0500 internal error");
    let (source, results) = unwrap_scan(err);
    assert!(matches!(source, SsspError::ServerFailure(_)));
    assert!(results[0].is_clean());
}

#[test]
fn test_single_done_fail_strips_one_leading_space() {
    let mut lines = ScriptSource::new(&["DONE FAIL  padded message", ""]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();

    assert_eq!(err.to_string(), " padded message");
}

#[test]
fn test_single_done_fail_message_starting_with_marker_letters() {
    let mut lines = ScriptSource::new(&["DONE FAIL FILE not readable", ""]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();

    assert_eq!(err.to_string(), "FILE not readable");
}

#[test]
fn test_single_read_error_takes_precedence() {
    // The exchange never reaches the empty-line sentinel; the I/O error
    // wins over the pending terminal failure.
    let mut lines = ScriptSource::new(&["DONE FAIL 0500 oops"]);
    let err = parse_single(&mut lines, "/tmp/a.txt").unwrap_err();
    let (source, results) = unwrap_scan(err);

    match source {
        SsspError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert_eq!(results.len(), 1);
}

#[test]
fn test_single_partial_result_on_read_error() {
    let mut lines = ScriptSource::new(&["VIRUS Sig /tmp/a.zip/inner"]);
    let err = parse_single(&mut lines, "/tmp/a.zip").unwrap_err();
    let (_, results) = unwrap_scan(err);

    assert!(results[0].infected);
    assert_eq!(results[0].signature, "Sig");
}

// =============================================================================
// Multi-target Mode Tests
// =============================================================================

#[test]
fn test_multi_directory_exchange() {
    let mut lines = ScriptSource::new(&[
        "ACC SCANDIR",
        "FAIL 0210 /tmp/bad.eml",
        "VIRUS EICAR-AV-Test /tmp/a.tar.bz2/Bzip2/a.txt",
        "OK 0 /tmp/a.tar.bz2",
        "DONE OK",
        "",
    ]);
    let results = parse_multi(&mut lines).unwrap();

    assert_eq!(results.len(), 2);

    assert_eq!(results[0].target, "/tmp/bad.eml");
    assert!(results[0].failed);
    assert!(!results[0].infected);
    assert_eq!(results[0].raw_line, "FAIL 0210 /tmp/bad.eml");

    assert_eq!(results[1].target, "/tmp/a.tar.bz2");
    assert!(results[1].infected);
    assert_eq!(results[1].signature, "EICAR-AV-Test");
    assert_eq!(results[1].archive_member, "/tmp/a.tar.bz2/Bzip2/a.txt");
}

#[test]
fn test_multi_clean_directory_is_empty() {
    let mut lines = ScriptSource::new(&["ACC SCANDIR", "DONE OK", ""]);
    let results = parse_multi(&mut lines).unwrap();

    assert!(results.is_empty());
}

#[test]
fn test_multi_preserves_arrival_order() {
    let mut lines = ScriptSource::new(&[
        "FAIL 0210 /tmp/one",
        "VIRUS Sig /tmp/two.zip/item",
        "OK 0 /tmp/two.zip",
        "FAIL 0212 /tmp/three",
        "DONE OK",
        "",
    ]);
    let results = parse_multi(&mut lines).unwrap();

    let targets: Vec<&str> = results.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, ["/tmp/one", "/tmp/two.zip", "/tmp/three"]);
}

#[test]
fn test_multi_member_cleared_when_virus_line_repeats_filename() {
    let mut lines = ScriptSource::new(&[
        "VIRUS EICAR-AV-Test /tmp/flat.txt",
        "OK 0 /tmp/flat.txt",
        "",
    ]);
    let results = parse_multi(&mut lines).unwrap();

    assert_eq!(results[0].target, "/tmp/flat.txt");
    assert_eq!(results[0].archive_member, "");
}

#[test]
fn test_multi_ignores_extra_virus_lines_within_item() {
    let mut lines = ScriptSource::new(&[
        "VIRUS First-Sig /tmp/a.zip/one",
        "VIRUS Second-Sig /tmp/a.zip/two",
        "OK 0 /tmp/a.zip",
        "",
    ]);
    let results = parse_multi(&mut lines).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].signature, "First-Sig");
    assert_eq!(results[0].archive_member, "/tmp/a.zip/one");
}

#[test]
fn test_multi_malformed_fail_line_still_appends() {
    let mut lines = ScriptSource::new(&["FAIL 0210", "DONE OK", ""]);
    let err = parse_multi(&mut lines).unwrap_err();
    let (source, results) = unwrap_scan(err);

    assert_eq!(source.to_string(), "Invalid server response: FAIL 0210");
    assert_eq!(results.len(), 1);
    assert!(results[0].failed);
    assert_eq!(results[0].target, "");
}

#[test]
fn test_multi_malformed_ok_line_keeps_provisional_member() {
    let mut lines = ScriptSource::new(&[
        "VIRUS Sig /tmp/a.zip/item",
        "OK 0",
        "",
    ]);
    let err = parse_multi(&mut lines).unwrap_err();
    let (source, results) = unwrap_scan(err);

    assert!(matches!(source, SsspError::InvalidResponse(_)));
    assert_eq!(results.len(), 1);
    assert!(results[0].infected);
    // The item never got an authoritative target, so the provisional
    // member candidate survives untouched.
    assert_eq!(results[0].target, "");
    assert_eq!(results[0].archive_member, "/tmp/a.zip/item");
}

#[test]
fn test_multi_done_fail_with_partial_results() {
    let mut lines = ScriptSource::new(&[
        "FAIL 0210 /tmp/bad.eml",
        "DONE FAIL 0500 scanner overloaded",
        "",
    ]);
    let err = parse_multi(&mut lines).unwrap_err();

    assert_eq!(err.to_string(), "0500 scanner overloaded");
    assert_eq!(err.partial_results().len(), 1);
    assert_eq!(err.partial_results()[0].target, "/tmp/bad.eml");
}

#[test]
fn test_multi_unterminated_virus_propagates_read_outcome() {
    // The VIRUS line never reaches its success line; no result may be
    // fabricated for it, and the read outcome surfaces with the results
    // completed before it.
    let mut lines = ScriptSource::new(&[
        "ACC SCANDIRR",
        "FAIL 0210 /tmp/bad.eml",
        "VIRUS Sig /tmp/lost.zip/item",
    ]);
    let err = parse_multi(&mut lines).unwrap_err();
    let (source, results) = unwrap_scan(err);

    assert!(matches!(source, SsspError::Io(_)));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].target, "/tmp/bad.eml");
}

#[test]
fn test_multi_malformed_virus_line() {
    let mut lines = ScriptSource::new(&["VIRUSSig broken", "DONE OK", ""]);
    let err = parse_multi(&mut lines).unwrap_err();
    let (source, results) = unwrap_scan(err);

    assert!(matches!(source, SsspError::MalformedVirusLine(_)));
    assert!(results.is_empty());
}
