//! Result definitions
//!
//! Per-item scan results returned to the caller.

/// The outcome for one scanned item.
///
/// `infected` and `failed` are mutually exclusive. `archive_member` is only
/// meaningful when `infected` is true and never equals `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Path or logical name the result refers to (`"stream"` for streamed
    /// submissions)
    pub target: String,

    /// Nested container entry the infection was found in, when it differs
    /// from `target`; empty otherwise
    pub archive_member: String,

    /// Malware signature name when infected; empty otherwise
    pub signature: String,

    /// Whether the server reported an infection
    pub infected: bool,

    /// Whether the server reported a per-item processing failure
    pub failed: bool,

    /// The raw protocol line behind the infection/failure determination,
    /// retained for diagnostics
    pub raw_line: String,
}

impl ScanResult {
    /// A result for `target` with nothing reported against it yet
    pub(crate) fn clean(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Whether the item was neither infected nor failed
    pub fn is_clean(&self) -> bool {
        !self.infected && !self.failed
    }
}
