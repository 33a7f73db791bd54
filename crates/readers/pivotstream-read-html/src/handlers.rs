//! Text and title extraction handlers.

use pivotstream_core::{collapse_whitespace, normalize};

use crate::{Attributes, HtmlHandler};

/// Tags whose boundaries are paragraph breaks.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "aside", "li", "ul", "ol", "h1", "h2",
    "h3", "h4", "h5", "h6", "nav", "main", "body", "blockquote", "pre", "figure", "figcaption",
    "table", "tr", "dl", "dt", "dd", "hr",
];

/// Tags whose text is never body text.
const SKIPPED_TAGS: &[&str] = &["title", "script", "style", "template"];

/// Tags allowed in `<head>`; any other start tag ends it.
const HEAD_TAGS: &[&str] = &[
    "title", "meta", "link", "style", "script", "base", "noscript", "template",
];

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

fn is_skipped(name: &str) -> bool {
    SKIPPED_TAGS.contains(&name)
}

fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

/// Collects body text, keeping block structure as line breaks.
#[derive(Debug, Default)]
pub struct TextCollector {
    parts: String,
    skip_depth: usize,
    in_head: bool,
}

impl TextCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized text collected so far.
    pub fn finish(self) -> String {
        normalize(&self.parts)
    }
}

impl HtmlHandler for TextCollector {
    fn start_tag(&mut self, name: &str, _attrs: &Attributes) {
        if name == "head" {
            self.in_head = true;
        } else if self.in_head && !HEAD_TAGS.contains(&name) {
            self.in_head = false;
        }
        if is_skipped(name) {
            self.skip_depth += 1;
        }
        if name == "br" || is_block(name) {
            self.parts.push('\n');
        }
    }

    fn end_tag(&mut self, name: &str) {
        if name == "head" {
            self.in_head = false;
        }
        if is_skipped(name) {
            self.skip_depth = self.skip_depth.saturating_sub(1);
        }
        if is_block(name) {
            self.parts.push('\n');
        }
    }

    fn text(&mut self, text: &str) {
        if self.skip_depth == 0 && !self.in_head {
            self.parts.push_str(text);
        }
    }
}

/// Captures the document title and the top-level heading.
///
/// The title is the first non-empty `<title>`. The heading is the first
/// non-empty heading of the highest rank present, so a leading `<h2>`
/// gives way to a later `<h1>`.
#[derive(Debug, Default)]
pub struct TitleCollector {
    title: Option<String>,
    heading: Option<(u8, String)>,
    in_title: bool,
    open_heading: Option<u8>,
    buf: String,
}

impl TitleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the first non-empty `<title>`.
    pub fn document_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Text of the top-level heading.
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_ref().map(|(_, text)| text.as_str())
    }

    /// Heading text if any, else the document title.
    pub fn inferred_title(&self) -> Option<String> {
        self.heading()
            .or_else(|| self.document_title())
            .map(str::to_string)
    }

    fn wants_heading(&self, level: u8) -> bool {
        self.heading.as_ref().is_none_or(|(best, _)| level < *best)
    }

    fn take_buf(&mut self) -> Option<String> {
        let text = collapse_whitespace(&normalize(&self.buf));
        self.buf.clear();
        (!text.is_empty()).then_some(text)
    }
}

impl HtmlHandler for TitleCollector {
    fn start_tag(&mut self, name: &str, _attrs: &Attributes) {
        if name == "title" && self.title.is_none() && self.open_heading.is_none() {
            self.in_title = true;
            self.buf.clear();
        } else if let Some(level) = heading_level(name)
            && !self.in_title
            && self.open_heading.is_none()
            && self.wants_heading(level)
        {
            self.open_heading = Some(level);
            self.buf.clear();
        } else if name == "br" && (self.in_title || self.open_heading.is_some()) {
            self.buf.push(' ');
        }
    }

    fn end_tag(&mut self, name: &str) {
        if name == "title" && self.in_title {
            self.in_title = false;
            self.title = self.take_buf();
        } else if let Some(level) = self.open_heading
            && heading_level(name) == Some(level)
        {
            self.open_heading = None;
            if let Some(text) = self.take_buf() {
                self.heading = Some((level, text));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_title || self.open_heading.is_some() {
            self.buf.push_str(text);
        }
    }
}
