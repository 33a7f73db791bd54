//! EPUB 2 NCX navigation map.

use pivotstream_core::collapse_whitespace;
use pivotstream_core::normalize::{decode_entities, normalize};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::package::{attr, local_name};
use crate::toc::TocEntry;

/// Parse the `navMap` of an NCX document.
///
/// Entries come out in document order. Depth is the `navPoint` nesting
/// level, clamped to `max_depth`. A `navPoint` keeps its first non-empty
/// label and its first `content@src`; points lacking either are dropped.
/// Malformed XML ends the walk with the entries seen so far.
pub(crate) fn parse_ncx(xml: &str, max_depth: usize) -> Vec<TocEntry> {
    let mut reader = Reader::from_str(xml);

    let mut entries: Vec<TocEntry> = Vec::new();
    // Indices into `entries` of the open navPoints.
    let mut stack: Vec<usize> = Vec::new();
    let mut label_depth = 0usize;
    let mut text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match local_name(&e).as_str() {
                "navPoint" => {
                    entries.push(TocEntry {
                        href: String::new(),
                        title: String::new(),
                        level: stack.len().min(max_depth),
                    });
                    stack.push(entries.len() - 1);
                }
                "navLabel" if !stack.is_empty() => label_depth += 1,
                "text" if label_depth > 0 => text = Some(String::new()),
                "content" => set_src(&mut entries, &stack, attr(&e, "src")),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if local_name(&e) == "content" {
                    set_src(&mut entries, &stack, attr(&e, "src"));
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(buf) = &mut text {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(buf) = &mut text {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(buf) = &mut text {
                    let entity = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                    buf.push_str(&decode_entities(&entity));
                }
            }
            Ok(Event::End(e)) => match String::from_utf8_lossy(e.local_name().as_ref()).as_ref() {
                "navPoint" => {
                    stack.pop();
                }
                "navLabel" => label_depth = label_depth.saturating_sub(1),
                "text" => {
                    if let Some(raw) = text.take()
                        && let Some(&open) = stack.last()
                        && entries[open].title.is_empty()
                    {
                        entries[open].title = collapse_whitespace(&normalize(&raw));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::debug!(
                    "ncx parse stopped at byte {}: {e}",
                    reader.buffer_position()
                );
                break;
            }
        }
    }

    entries.retain(|entry| !entry.href.is_empty() && !entry.title.is_empty());
    entries
}

fn set_src(entries: &mut [TocEntry], stack: &[usize], src: Option<String>) {
    if let (Some(&open), Some(src)) = (stack.last(), src) {
        let entry = &mut entries[open];
        if entry.href.is_empty() {
            entry.href = src.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="x"/></head>
  <docTitle><text>Book Title</text></docTitle>
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>Part   One</text></navLabel>
      <content src="part1.xhtml"/>
      <navPoint id="p1c1" playOrder="2">
        <navLabel><text>Chapter &amp; Verse</text></navLabel>
        <content src="ch1.xhtml#start"/>
        <navPoint id="deep" playOrder="3">
          <navLabel><text>Deep</text></navLabel>
          <content src="ch1.xhtml#deep"/>
        </navPoint>
      </navPoint>
    </navPoint>
    <navPoint id="nolabel" playOrder="4">
      <navLabel><text>  </text></navLabel>
      <content src="ch2.xhtml"/>
    </navPoint>
    <navPoint id="p2" playOrder="5">
      <navLabel><text>Part Two</text></navLabel>
      <content src="part2.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

    fn entry(href: &str, title: &str, level: usize) -> TocEntry {
        TocEntry {
            href: href.into(),
            title: title.into(),
            level,
        }
    }

    #[test]
    fn test_nested_nav_points() {
        assert_eq!(
            parse_ncx(NCX, 32),
            vec![
                entry("part1.xhtml", "Part One", 0),
                entry("ch1.xhtml#start", "Chapter & Verse", 1),
                entry("ch1.xhtml#deep", "Deep", 2),
                entry("part2.xhtml", "Part Two", 0),
            ]
        );
    }

    #[test]
    fn test_depth_is_clamped() {
        let levels: Vec<usize> = parse_ncx(NCX, 1).iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_doc_title_is_not_an_entry() {
        let entries = parse_ncx(NCX, 32);
        assert!(entries.iter().all(|e| e.title != "Book Title"));
    }

    #[test]
    fn test_truncated_document_keeps_prefix() {
        let cut = &NCX[..NCX.find("<navPoint id=\"nolabel\"").unwrap()];
        let broken = format!("{cut}</navMap></wrong>");
        let entries = parse_ncx(&broken, 32);
        assert_eq!(entries.len(), 3);
    }
}
