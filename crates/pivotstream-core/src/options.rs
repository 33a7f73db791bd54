//! Extraction options.

/// Options shared by the EPUB and PDF readers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractOptions {
    /// Deepest table-of-contents level kept; deeper entries are clamped to it.
    pub max_toc_depth: usize,
    /// Lines longer than this are never treated as inferred PDF headings.
    pub section_max_line_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_toc_depth: 32,
            section_max_line_chars: 120,
        }
    }
}
