//! HTML reader for pivotstream.
//!
//! Turns one HTML or XHTML fragment into normalized plain text without
//! building a tree. A single forward [`scan`] feeds start tags, end tags
//! and text to an [`HtmlHandler`]; the extractors in this crate are
//! independent handlers that can share one scan:
//!
//! - [`TextCollector`] - body text with block boundaries kept as line breaks
//! - [`TitleCollector`] - `<title>` text and the top-level heading
//! - [`NavTocCollector`] - links of an EPUB 3 navigation document
//!
//! # Example
//!
//! ```
//! let page = pivotstream_read_html::extract(
//!     "<html><head><title>Doc</title></head>\
//!      <body><h1>One</h1><p>Hello &amp; welcome.</p></body></html>",
//! );
//! assert_eq!(page.text, "One\n\nHello & welcome.");
//! assert_eq!(page.title.as_deref(), Some("One"));
//! ```

mod handlers;
mod nav;
mod scan;

pub use handlers::{TextCollector, TitleCollector};
pub use nav::{NavLink, NavTocCollector};
pub use scan::{Attributes, HtmlHandler, scan};

/// Text and inferred title of one HTML document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlText {
    /// Normalized body text.
    pub text: String,
    /// Top-level heading text, else `<title>` text.
    pub title: Option<String>,
}

/// Extract normalized plain text from an HTML fragment.
pub fn html_to_text(html: &str) -> String {
    let mut collector = TextCollector::new();
    scan(html, &mut collector);
    collector.finish()
}

/// Extract text and inferred title in one pass.
pub fn extract(html: &str) -> HtmlText {
    let mut handlers = (TextCollector::new(), TitleCollector::new());
    scan(html, &mut handlers);
    let (text, title) = handlers;
    HtmlText {
        text: text.finish(),
        title: title.inferred_title(),
    }
}
