//! Table-of-contents resolution.
//!
//! Each strategy reads one kind of navigation source and yields chapter
//! markers, or nothing when its source is absent or resolves to no
//! spine item. Strategies are tried in order and the first that yields
//! markers wins.

use pivotstream_core::{
    ChapterMarker, ExtractOptions, ExtractWarning, Severity, WarningKind, path,
};
use pivotstream_read_html::{NavTocCollector, scan};

use crate::archive::{Archive, decode_text};
use crate::ncx::parse_ncx;
use crate::package::{ManifestItem, Package, resolve_href};
use crate::spine::ReadingOrder;

const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// A navigation entry before it is matched against the reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TocEntry {
    /// Reference as written, relative to the navigation document.
    pub href: String,
    pub title: String,
    pub level: usize,
}

/// Everything a strategy may look at.
pub(crate) struct TocContext<'a, 'z> {
    pub archive: &'a mut Archive<'z>,
    pub package: &'a Package,
    pub order: &'a ReadingOrder,
    pub options: &'a ExtractOptions,
    pub warnings: &'a mut Vec<ExtractWarning>,
}

type Strategy = fn(&mut TocContext<'_, '_>) -> Option<Vec<ChapterMarker>>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("nav document", from_nav),
    ("ncx", from_ncx),
    ("spine", from_spine),
];

/// Chapter markers for the reading order, from the best available source.
pub(crate) fn resolve(cx: &mut TocContext<'_, '_>) -> Vec<ChapterMarker> {
    for &(name, strategy) in STRATEGIES {
        if let Some(markers) = strategy(cx) {
            log::trace!("table of contents from {name}: {} markers", markers.len());
            return markers;
        }
        log::trace!("no table of contents from {name}");
    }
    Vec::new()
}

/// EPUB 3 navigation document.
fn from_nav(cx: &mut TocContext<'_, '_>) -> Option<Vec<ChapterMarker>> {
    let package = cx.package;
    let item = package.manifest.iter().find(|i| i.has_property("nav"))?;
    let (nav_path, source) = read_item(cx, item)?;

    let mut collector = NavTocCollector::new();
    scan(&source, &mut collector);
    if !collector.found() {
        log::debug!("{nav_path} has no toc nav");
        return None;
    }

    let entries: Vec<TocEntry> = collector
        .into_links()
        .into_iter()
        .map(|link| TocEntry {
            href: link.href,
            title: link.title,
            level: link.level,
        })
        .collect();
    match_entries(cx, &nav_path, entries)
}

/// EPUB 2 NCX.
fn from_ncx(cx: &mut TocContext<'_, '_>) -> Option<Vec<ChapterMarker>> {
    let package = cx.package;
    let manifest = &package.manifest;
    let item = package
        .toc_id
        .as_deref()
        .and_then(|id| manifest.by_id(id))
        .or_else(|| {
            manifest
                .iter()
                .find(|i| i.media_essence().as_deref() == Some(NCX_MEDIA_TYPE))
        })
        .or_else(|| manifest.by_id("ncx"))?;
    let (ncx_path, source) = read_item(cx, item)?;

    let entries = parse_ncx(&source, cx.options.max_toc_depth);
    match_entries(cx, &ncx_path, entries)
}

/// One marker per spine document.
fn from_spine(cx: &mut TocContext<'_, '_>) -> Option<Vec<ChapterMarker>> {
    let markers: Vec<ChapterMarker> = cx
        .order
        .items
        .iter()
        .zip(&cx.order.starts)
        .enumerate()
        .filter_map(|(n, (item, &start))| {
            let fallback = format!("Chapter {}", n + 1);
            let title = item.title.as_deref().unwrap_or(&fallback);
            ChapterMarker::new(title, start, 0)
        })
        .collect();
    (!markers.is_empty()).then_some(markers)
}

/// Read a navigation document, returning its archive path and text.
fn read_item(cx: &mut TocContext<'_, '_>, item: &ManifestItem) -> Option<(String, String)> {
    let item_path = cx.package.resolve(item);
    match cx.archive.read(&item_path) {
        Ok(Some(bytes)) => {
            let text = decode_text(&bytes, &item_path, cx.warnings).into_owned();
            Some((item_path, text))
        }
        Ok(None) => {
            log::debug!("navigation document {item_path} is not in the archive");
            None
        }
        Err(e) => {
            log::debug!("could not read navigation document {item_path}: {e}");
            cx.warnings.push(ExtractWarning::new(
                Severity::Minor,
                WarningKind::SkippedItem(item.href.clone()),
                format!("could not read navigation document {item_path}: {e}"),
            ));
            None
        }
    }
}

/// Match entries from the document at `doc_path` against the reading
/// order. Unmatched entries are dropped with a warning; the result is
/// sorted by token index, keeping source order for ties.
fn match_entries(
    cx: &mut TocContext<'_, '_>,
    doc_path: &str,
    entries: Vec<TocEntry>,
) -> Option<Vec<ChapterMarker>> {
    let base = path::parent_dir(doc_path);
    let max_depth = cx.options.max_toc_depth;

    let mut markers = Vec::with_capacity(entries.len());
    for entry in entries {
        let target = if path::strip_fragment(&entry.href).is_empty() {
            doc_path.to_string()
        } else {
            resolve_href(base, &entry.href)
        };

        let Some(start) = cx.order.start_of(&target) else {
            log::debug!("toc entry {:?} points at {target}, not in the reading order", entry.title);
            cx.warnings.push(ExtractWarning::new(
                Severity::Minor,
                WarningKind::UnresolvedTocEntry(entry.href.clone()),
                format!("toc entry {:?} points at {target}, which has no text", entry.title),
            ));
            continue;
        };

        match ChapterMarker::new(&entry.title, start, entry.level.min(max_depth)) {
            Some(marker) => markers.push(marker),
            None => log::debug!("dropping untitled toc entry for {target}"),
        }
    }

    markers.sort_by_key(|m| m.start_token_index);
    (!markers.is_empty()).then_some(markers)
}
