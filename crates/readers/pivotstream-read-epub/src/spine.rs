//! Reading-order text extraction.

use std::collections::HashMap;

use pivotstream_core::{ExtractWarning, Severity, WarningKind};
use pivotstream_tokenize::count_tokens;

use crate::archive::{Archive, decode_text};
use crate::package::Package;

/// Media types read as body text.
const TEXT_MEDIA_TYPES: &[&str] = &[
    "application/xhtml+xml",
    "text/html",
    "application/x-dtbook+xml",
];

/// One spine document with readable text.
#[derive(Debug, Clone)]
pub(crate) struct SpineItem {
    /// Manifest href as written.
    pub href: String,
    /// Resolved archive path.
    pub zip_path: String,
    /// Normalized body text, never empty.
    pub text: String,
    /// Top-level heading or `<title>`.
    pub title: Option<String>,
}

/// Spine items with their token offsets into the joined text.
#[derive(Debug, Default)]
pub(crate) struct ReadingOrder {
    pub items: Vec<SpineItem>,
    /// Token index at which each item starts.
    pub starts: Vec<usize>,
    /// Archive path to item index, first occurrence wins.
    by_path: HashMap<String, usize>,
}

impl ReadingOrder {
    fn push(&mut self, item: SpineItem, start: usize) {
        self.by_path
            .entry(item.zip_path.clone())
            .or_insert(self.items.len());
        self.items.push(item);
        self.starts.push(start);
    }

    /// Token index where the document at `zip_path` starts.
    pub(crate) fn start_of(&self, zip_path: &str) -> Option<usize> {
        self.by_path.get(zip_path).map(|&i| self.starts[i])
    }

    /// All item texts joined with paragraph breaks.
    pub(crate) fn joined_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Read every spine document that carries text.
///
/// Items with a non-text media type, a missing archive entry or an
/// unreadable entry are skipped with a warning. Items without text are
/// dropped silently.
pub(crate) fn read_spine(
    archive: &mut Archive<'_>,
    package: &Package,
    warnings: &mut Vec<ExtractWarning>,
) -> ReadingOrder {
    let mut order = ReadingOrder::default();
    let mut next_start = 0;

    for &index in &package.spine {
        let Some(item) = package.manifest.get(index) else {
            continue;
        };

        if let Some(essence) = item.media_essence()
            && !TEXT_MEDIA_TYPES.contains(&essence.as_str())
        {
            log::debug!("skipping spine item {} with media type {essence}", item.href);
            warnings.push(ExtractWarning::new(
                Severity::Info,
                WarningKind::UnsupportedMediaType(essence.clone()),
                format!("spine item {} is {essence}, not text", item.href),
            ));
            continue;
        }

        let zip_path = package.resolve(item);
        let raw_path = format!("{}/{}", package.dir(), item.href);
        let bytes = match archive.read_any(&[zip_path.as_str(), raw_path.trim_start_matches('/')]) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                skip(warnings, &item.href, format!("{zip_path} is not in the archive"));
                continue;
            }
            Err(e) => {
                skip(warnings, &item.href, format!("could not read {zip_path}: {e}"));
                continue;
            }
        };

        let source = decode_text(&bytes, &zip_path, warnings);
        let page = pivotstream_read_html::extract(&source);
        if page.text.is_empty() {
            log::debug!("spine item {zip_path} has no text");
            continue;
        }

        let tokens = count_tokens(&page.text);
        order.push(
            SpineItem {
                href: item.href.clone(),
                zip_path,
                text: page.text,
                title: page.title,
            },
            next_start,
        );
        next_start += tokens;
    }

    order
}

fn skip(warnings: &mut Vec<ExtractWarning>, href: &str, message: String) {
    log::debug!("skipping spine item {href}: {message}");
    warnings.push(ExtractWarning::new(
        Severity::Major,
        WarningKind::SkippedItem(href.to_string()),
        message,
    ));
}
