//! Chapter and section markers.

/// A navigable position in the token stream of an extracted document.
///
/// `start_token_index` counts tokens produced by tokenizing the *whole*
/// extracted text, so markers from different chapters share one index
/// space.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChapterMarker {
    /// Whitespace-normalized, never empty.
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "start_index"))]
    pub start_token_index: usize,
    /// Nesting depth, 0 is top level.
    pub level: usize,
}

impl ChapterMarker {
    /// Create a marker, collapsing whitespace in the title.
    ///
    /// Returns `None` when the title is blank.
    pub fn new(title: &str, start_token_index: usize, level: usize) -> Option<Self> {
        let title = collapse_whitespace(title);
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title,
            start_token_index,
            level,
        })
    }
}

/// Collapse every whitespace run (newlines included) to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
