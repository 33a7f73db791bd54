//! Extraction errors.

use std::fmt;
use std::time::Duration;

/// Container format an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Epub,
    Pdf,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Epub => f.write_str("EPUB"),
            Format::Pdf => f.write_str("PDF"),
        }
    }
}

/// Error during document extraction.
///
/// Only malformed input and exhausted deadlines surface here. Units that
/// fail individually (a spine item, a page) are skipped and reported as
/// [`ExtractWarning`](crate::ExtractWarning)s instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid EPUB archive: {0}")]
    InvalidArchive(String),
    #[error("EPUB is missing container.xml")]
    MissingContainer,
    #[error("EPUB rootfile not found")]
    MissingRootfile,
    #[error("Invalid PDF: {0}")]
    InvalidFile(String),
    #[error("{0} had no readable text")]
    NoReadableText(Format),
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether resubmitting the same input could succeed.
    ///
    /// Only a deadline failure qualifies; every other variant describes
    /// the input itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractError::Timeout(_))
    }
}

/// Result alias used across the reader crates.
pub type Result<T> = std::result::Result<T, ExtractError>;
