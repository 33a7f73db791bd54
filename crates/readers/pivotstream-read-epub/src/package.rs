//! Container and package document (OPF) parsing.

use std::collections::HashMap;

use pivotstream_core::normalize::decode_entities;
use pivotstream_core::{ExtractError, ExtractWarning, Result, Severity, WarningKind, path};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::archive::{Archive, decode_text};

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Find the package document path named by `META-INF/container.xml`.
pub(crate) fn read_container(
    archive: &mut Archive<'_>,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<String> {
    let bytes = archive
        .read(CONTAINER_PATH)
        .map_err(|e| ExtractError::InvalidArchive(format!("{CONTAINER_PATH}: {e}")))?
        .ok_or(ExtractError::MissingContainer)?;
    let xml = decode_text(&bytes, CONTAINER_PATH, warnings);
    parse_container(&xml)
}

fn parse_container(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if local_name(&e) == "rootfile" => {
                if let Some(full_path) = attr(&e, "full-path")
                    && !full_path.trim().is_empty()
                {
                    return Ok(full_path.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::InvalidArchive(format!(
                    "malformed {CONTAINER_PATH}: {e}"
                )));
            }
            _ => {}
        }
    }

    Err(ExtractError::MissingRootfile)
}

/// One manifest `<item>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ManifestItem {
    pub id: String,
    /// Raw `href`, relative to the package document.
    pub href: String,
    pub media_type: Option<String>,
    pub properties: Vec<String>,
}

impl ManifestItem {
    pub(crate) fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }

    /// Media type without parameters, lowercased.
    pub(crate) fn media_essence(&self) -> Option<String> {
        self.media_type.as_deref().map(|mt| {
            mt.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Manifest items in document order, addressed by index.
#[derive(Debug, Default)]
pub(crate) struct Manifest {
    items: Vec<ManifestItem>,
    by_id: HashMap<String, usize>,
}

impl Manifest {
    /// Add an item. A repeated id keeps the first item.
    fn push(&mut self, item: ManifestItem) {
        if self.by_id.contains_key(&item.id) {
            log::debug!("ignoring duplicate manifest id {:?}", item.id);
            return;
        }
        self.by_id.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&ManifestItem> {
        self.items.get(index)
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<&ManifestItem> {
        self.index_of(id).and_then(|i| self.get(i))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ManifestItem> {
        self.items.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// The parts of a package document the extractor needs.
#[derive(Debug)]
pub(crate) struct Package {
    /// Archive path of the package document.
    pub path: String,
    pub manifest: Manifest,
    /// Reading order as manifest indices.
    pub spine: Vec<usize>,
    /// The spine's `toc` attribute (EPUB 2 NCX id).
    pub toc_id: Option<String>,
}

impl Package {
    /// Directory that manifest hrefs are relative to.
    pub(crate) fn dir(&self) -> &str {
        path::parent_dir(&self.path)
    }

    /// Archive path of a manifest item, percent-decoded and normalized.
    pub(crate) fn resolve(&self, item: &ManifestItem) -> String {
        resolve_href(self.dir(), &item.href)
    }
}

/// Resolve a reference relative to `base_dir`: fragment dropped,
/// percent-decoded, normalized.
pub(crate) fn resolve_href(base_dir: &str, href: &str) -> String {
    let href = path::strip_fragment(href.trim());
    let decoded = percent_encoding::percent_decode_str(href).decode_utf8_lossy();
    path::join(base_dir, &decoded)
}

/// Read and parse the package document at `opf_path`.
pub(crate) fn read_package(
    archive: &mut Archive<'_>,
    opf_path: &str,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Package> {
    let normalized = path::normalize_path(opf_path);
    let bytes = archive
        .read_any(&[opf_path, normalized.as_str()])
        .map_err(|e| ExtractError::InvalidArchive(format!("{opf_path}: {e}")))?
        .ok_or(ExtractError::MissingRootfile)?;
    let xml = decode_text(&bytes, opf_path, warnings);
    let mut package = parse_package(&xml, warnings)?;
    package.path = normalized;
    Ok(package)
}

fn parse_package(xml: &str, warnings: &mut Vec<ExtractWarning>) -> Result<Package> {
    let mut reader = Reader::from_str(xml);

    let mut manifest = Manifest::default();
    let mut spine_ids: Vec<String> = Vec::new();
    let mut toc_id = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match local_name(&e).as_str() {
                "item" => {
                    let (Some(id), Some(href)) = (attr(&e, "id"), attr(&e, "href")) else {
                        log::debug!("skipping manifest item without id or href");
                        continue;
                    };
                    manifest.push(ManifestItem {
                        id,
                        href,
                        media_type: attr(&e, "media-type"),
                        properties: attr(&e, "properties")
                            .map(|p| p.split_ascii_whitespace().map(str::to_string).collect())
                            .unwrap_or_default(),
                    });
                }
                "itemref" => {
                    if let Some(idref) = attr(&e, "idref") {
                        spine_ids.push(idref);
                    }
                }
                "spine" => toc_id = attr(&e, "toc").filter(|id| !id.is_empty()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::InvalidArchive(format!(
                    "malformed package document: {e}"
                )));
            }
            _ => {}
        }
    }

    let spine = if spine_ids.is_empty() {
        log::debug!("package has an empty spine, using manifest order");
        (0..manifest.len()).collect()
    } else {
        spine_ids
            .iter()
            .filter_map(|idref| {
                let index = manifest.index_of(idref);
                if index.is_none() {
                    log::debug!("spine references unknown manifest id {idref:?}");
                    warnings.push(ExtractWarning::new(
                        Severity::Major,
                        WarningKind::SkippedItem(idref.clone()),
                        format!("spine item {idref:?} is not in the manifest"),
                    ));
                }
                index
            })
            .collect()
    };

    Ok(Package {
        path: String::new(),
        manifest,
        spine,
        toc_id,
    })
}

/// Local name of an element (`opf:item` is `item`).
pub(crate) fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

/// Entity-decoded value of the unprefixed attribute `key`.
pub(crate) fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .map(|a| decode_entities(&String::from_utf8_lossy(&a.value)))
}
