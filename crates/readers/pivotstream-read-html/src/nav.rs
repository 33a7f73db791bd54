//! EPUB 3 navigation document links.

use pivotstream_core::{collapse_whitespace, normalize};

use crate::{Attributes, HtmlHandler};

/// One table-of-contents link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Raw `href` as written, relative to the navigation document.
    pub href: String,
    /// Link text, whitespace collapsed.
    pub title: String,
    /// Nesting depth, 0 for top-level entries.
    pub level: usize,
}

/// Collects links from the table-of-contents `<nav>`.
///
/// Only the first `<nav>` whose `epub:type`, `type`, `role` or `id`
/// mentions `toc` is read. Links without an `href` or without text are
/// skipped.
#[derive(Debug, Default)]
pub struct NavTocCollector {
    links: Vec<NavLink>,
    /// Open `<nav>` elements inside the toc nav, counting the toc nav itself.
    nav_depth: usize,
    done: bool,
    list_depth: usize,
    anchor: Option<(String, String)>,
}

impl NavTocCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a toc `<nav>` was found.
    pub fn found(&self) -> bool {
        self.done || self.nav_depth > 0
    }

    pub fn into_links(self) -> Vec<NavLink> {
        self.links
    }

    fn is_toc_nav(attrs: &Attributes) -> bool {
        ["epub:type", "type", "role", "id"].iter().any(|key| {
            attrs
                .get(key)
                .is_some_and(|v| v.to_ascii_lowercase().contains("toc"))
        })
    }
}

impl HtmlHandler for NavTocCollector {
    fn start_tag(&mut self, name: &str, attrs: &Attributes) {
        if self.done {
            return;
        }
        if self.nav_depth == 0 {
            if name == "nav" && Self::is_toc_nav(attrs) {
                self.nav_depth = 1;
            }
            return;
        }
        match name {
            "nav" => self.nav_depth += 1,
            "ol" | "ul" => self.list_depth += 1,
            "a" => {
                // A nested anchor replaces an unclosed one.
                self.anchor = attrs
                    .get("href")
                    .map(|href| (href.trim().to_string(), String::new()));
            }
            "br" => {
                if let Some((_, text)) = &mut self.anchor {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        if self.done || self.nav_depth == 0 {
            return;
        }
        match name {
            "nav" => {
                self.nav_depth -= 1;
                if self.nav_depth == 0 {
                    self.done = true;
                }
            }
            "ol" | "ul" => self.list_depth = self.list_depth.saturating_sub(1),
            "a" => {
                if let Some((href, text)) = self.anchor.take() {
                    let title = collapse_whitespace(&normalize(&text));
                    if href.is_empty() || title.is_empty() {
                        log::debug!("skipping nav link {href:?} with no usable target or text");
                        return;
                    }
                    self.links.push(NavLink {
                        href,
                        title,
                        level: self.list_depth.saturating_sub(1),
                    });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, buf)) = &mut self.anchor {
            buf.push_str(text);
        }
    }
}
