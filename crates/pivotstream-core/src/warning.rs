//! Non-fatal extraction warnings - know what was skipped.

/// Result of an extraction, including warnings about skipped content.
#[derive(Debug)]
pub struct Extracted<T> {
    /// The extraction output.
    pub value: T,
    /// Units that were skipped or recovered from.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> Extracted<T> {
    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A warning about content that could not be used as-is.
#[derive(Debug, Clone)]
pub struct ExtractWarning {
    /// How much content was lost.
    pub severity: Severity,
    /// What kind of issue.
    pub kind: WarningKind,
    /// Human-readable message.
    pub message: String,
}

impl ExtractWarning {
    /// Create a new warning.
    pub fn new(severity: Severity, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
        }
    }
}

/// Severity of an extraction warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Information only, no text lost.
    Info,
    /// Navigation or decoding differs from the source.
    Minor,
    /// Readable text was dropped.
    Major,
}

/// Kind of extraction issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A spine item was referenced but could not be read or parsed.
    SkippedItem(String),
    /// A spine item has a media type that is not readable text.
    UnsupportedMediaType(String),
    /// A document was not valid UTF-8 and was decoded as Latin-1.
    DecodeFallback(String),
    /// A table-of-contents entry points at nothing in the reading order.
    UnresolvedTocEntry(String),
    /// A PDF page produced no text (1-based page number).
    EmptyPage(usize),
}
