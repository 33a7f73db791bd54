//! EPUB reader for pivotstream.
//!
//! Extracts the linear reading text of an EPUB container and a chapter
//! list whose indices point into the token stream of that text.
//!
//! Chapters come from the first source that resolves: the EPUB 3
//! navigation document, the EPUB 2 NCX, and finally one chapter per
//! spine document titled by its heading.

mod archive;
mod ncx;
mod package;
mod spine;
mod toc;

use pivotstream_core::{
    ChapterMarker, ExtractError, ExtractOptions, Extracted, Format, Result, normalize,
};

use crate::archive::Archive;
use crate::toc::TocContext;

/// Text and chapters of an EPUB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubText {
    /// Normalized reading text, spine documents separated by blank lines.
    pub text: String,
    /// Chapter markers in reading order.
    pub chapters: Vec<ChapterMarker>,
}

/// Extract text and chapters from EPUB bytes.
pub fn extract_epub(input: &[u8]) -> Result<Extracted<EpubText>> {
    extract_epub_with_options(input, &ExtractOptions::default())
}

/// Extract text and chapters from EPUB bytes with options.
pub fn extract_epub_with_options(
    input: &[u8],
    options: &ExtractOptions,
) -> Result<Extracted<EpubText>> {
    let mut archive = Archive::open(input)?;
    let mut warnings = Vec::new();

    let rootfile = package::read_container(&mut archive, &mut warnings)?;
    let package = package::read_package(&mut archive, &rootfile, &mut warnings)?;
    let order = spine::read_spine(&mut archive, &package, &mut warnings);

    let text = normalize(&order.joined_text());
    if text.is_empty() {
        return Err(ExtractError::NoReadableText(Format::Epub));
    }

    let chapters = toc::resolve(&mut TocContext {
        archive: &mut archive,
        package: &package,
        order: &order,
        options,
        warnings: &mut warnings,
    });

    Ok(Extracted::with_warnings(EpubText { text, chapters }, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotstream_core::WarningKind;
    use pivotstream_tokenize::tokenize;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;

    fn create_test_epub(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();

            zip.start_file("mimetype", options).unwrap();
            zip.write_all(b"application/epub+zip").unwrap();

            for (name, contents) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(contents).unwrap();
            }

            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    fn opf(manifest: &str, spine: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Test</dc:title></metadata>
  <manifest>{manifest}</manifest>
  <spine{spine}</spine>
</package>"#
        )
    }

    fn chapter(title: &str, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>{title}</title></head>
<body>{body}</body></html>"#
        )
    }

    #[test]
    fn test_nav_document_chapters() {
        let opf = opf(
            r#"<item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
<item id="c1" href="text/c1.xhtml" media-type="application/xhtml+xml"/>
<item id="c2" href="text/c2.xhtml" media-type="application/xhtml+xml"/>"#,
            r#"><itemref idref="c1"/><itemref idref="c2"/>"#,
        );
        let nav = r#"<html xmlns:epub="http://www.idpf.org/2007/ops"><body>
<nav epub:type="toc"><ol>
<li><a href="text/c1.xhtml">Opening</a></li>
<li><a href="text/c2.xhtml#top">Closing</a></li>
<li><a href="text/gone.xhtml">Gone</a></li>
</ol></nav></body></html>"#;
        let c1 = chapter("One", "<p>Alpha beta gamma.</p>");
        let c2 = chapter("Two", "<p>Delta epsilon.</p>");
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/nav.xhtml", nav.as_bytes()),
            ("OEBPS/text/c1.xhtml", c1.as_bytes()),
            ("OEBPS/text/c2.xhtml", c2.as_bytes()),
        ]);

        let result = extract_epub(&epub).unwrap();
        let book = &result.value;
        assert_eq!(book.text, "Alpha beta gamma.\n\nDelta epsilon.");

        let chapters: Vec<(&str, usize)> = book
            .chapters
            .iter()
            .map(|c| (c.title.as_str(), c.start_token_index))
            .collect();
        assert_eq!(chapters, vec![("Opening", 0), ("Closing", 3)]);
        assert_eq!(tokenize(&book.text)[3].core, "Delta");

        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::UnresolvedTocEntry("text/gone.xhtml".into()))
        );
    }

    #[test]
    fn test_ncx_chapters() {
        let opf = opf(
            r#"<item id="toc" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
<item id="c1" href="c1.html" media-type="text/html"/>
<item id="c2" href="c2.html" media-type="text/html"/>"#,
            r#" toc="toc"><itemref idref="c1"/><itemref idref="c2"/>"#,
        );
        let ncx = r#"<ncx><navMap>
<navPoint id="a"><navLabel><text>First</text></navLabel><content src="c1.html"/>
  <navPoint id="b"><navLabel><text>Inner</text></navLabel><content src="c2.html#x"/></navPoint>
</navPoint>
</navMap></ncx>"#;
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/toc.ncx", ncx.as_bytes()),
            ("OEBPS/c1.html", b"<p>one two</p>"),
            ("OEBPS/c2.html", b"<p>three</p>"),
        ]);

        let book = extract_epub(&epub).unwrap().value;
        assert_eq!(
            book.chapters,
            vec![
                ChapterMarker::new("First", 0, 0).unwrap(),
                ChapterMarker::new("Inner", 2, 1).unwrap(),
            ]
        );
    }

    fn ncx_two_chapters() -> &'static str {
        r#"<ncx><navMap>
<navPoint id="a"><navLabel><text>Start</text></navLabel><content src="c1.html"/></navPoint>
<navPoint id="b"><navLabel><text>Finish</text></navLabel><content src="c2.html"/></navPoint>
</navMap></ncx>"#
    }

    #[test]
    fn test_ncx_found_by_media_type() {
        let opf = opf(
            r#"<item id="navigation" href="nav/toc.ncx" media-type="application/x-dtbncx+xml"/>
<item id="c1" href="c1.html" media-type="text/html"/>
<item id="c2" href="c2.html" media-type="text/html"/>"#,
            r#"><itemref idref="c1"/><itemref idref="c2"/>"#,
        );
        let ncx = ncx_two_chapters().replace("src=\"", "src=\"../");
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/nav/toc.ncx", ncx.as_bytes()),
            ("OEBPS/c1.html", b"<p>one two</p>"),
            ("OEBPS/c2.html", b"<p>three</p>"),
        ]);

        let book = extract_epub(&epub).unwrap().value;
        assert_eq!(
            book.chapters,
            vec![
                ChapterMarker::new("Start", 0, 0).unwrap(),
                ChapterMarker::new("Finish", 2, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_ncx_found_by_id() {
        let opf = opf(
            r#"<item id="ncx" href="toc.xml" media-type="application/xml"/>
<item id="c1" href="c1.html" media-type="text/html"/>
<item id="c2" href="c2.html" media-type="text/html"/>"#,
            r#"><itemref idref="c1"/><itemref idref="c2"/>"#,
        );
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/toc.xml", ncx_two_chapters().as_bytes()),
            ("OEBPS/c1.html", b"<p>one two</p>"),
            ("OEBPS/c2.html", b"<p>three</p>"),
        ]);

        let titles: Vec<String> = extract_epub(&epub)
            .unwrap()
            .value
            .chapters
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Start", "Finish"]);
    }

    #[test]
    fn test_loose_html_chapter() {
        let opf = opf(
            r#"<item id="c1" href="c1.html" media-type="text/html"/>"#,
            r#"><itemref idref="c1"/>"#,
        );
        let c1 = "<html><head><title>Loose</title><body>\
                  <script>if (a<b) { go(); }</script>\
                  <p>AT&T rocks & rolls.</p><p>if a < b then stop</p>";
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/c1.html", c1.as_bytes()),
        ]);

        let book = extract_epub(&epub).unwrap().value;
        assert_eq!(book.text, "AT&T rocks & rolls.\n\nif a < b then stop");
        assert_eq!(book.chapters, vec![ChapterMarker::new("Loose", 0, 0).unwrap()]);
    }

    #[test]
    fn test_latin1_container_is_reported() {
        let container = b"<container><!-- r\xE9sum\xE9 --><rootfiles>\
            <rootfile full-path=\"OEBPS/content.opf\"/></rootfiles></container>";
        let opf = opf(
            r#"<item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>"#,
            r#"><itemref idref="c1"/>"#,
        );
        let epub = create_test_epub(&[
            ("META-INF/container.xml", container),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/c1.xhtml", b"<p>Body.</p>"),
        ]);

        let result = extract_epub(&epub).unwrap();
        assert_eq!(result.value.text, "Body.");
        assert_eq!(
            result
                .warnings
                .iter()
                .map(|w| &w.kind)
                .collect::<Vec<_>>(),
            vec![&WarningKind::DecodeFallback("META-INF/container.xml".into())]
        );
    }

    #[test]
    fn test_spine_fallback_titles() {
        let opf = opf(
            r#"<item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>
<item id="img" href="cover.jpg" media-type="image/jpeg"/>
<item id="c2" href="c2.xhtml" media-type="application/xhtml+xml"/>"#,
            r#"><itemref idref="c1"/><itemref idref="img"/><itemref idref="c2"/>"#,
        );
        let c1 = "<html><body><h1>Heading One</h1><p>Text.</p></body></html>";
        let c2 = "<html><body><p>Untitled text.</p></body></html>";
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/c1.xhtml", c1.as_bytes()),
            ("OEBPS/c2.xhtml", c2.as_bytes()),
            ("OEBPS/cover.jpg", b"\xFF\xD8"),
        ]);

        let result = extract_epub(&epub).unwrap();
        assert_eq!(
            result.value.chapters,
            vec![
                ChapterMarker::new("Heading One", 0, 0).unwrap(),
                ChapterMarker::new("Chapter 2", 3, 0).unwrap(),
            ]
        );
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::UnsupportedMediaType("image/jpeg".into()))
        );
    }

    #[test]
    fn test_percent_encoded_href_and_latin1() {
        let opf = opf(
            r#"<item id="c1" href="my%20chapter.xhtml" media-type="application/xhtml+xml"/>"#,
            r#"><itemref idref="c1"/>"#,
        );
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/my chapter.xhtml", b"<p>Caf\xE9 cr\xE8me</p>"),
        ]);

        let result = extract_epub(&epub).unwrap();
        assert_eq!(result.value.text, "Caf\u{e9} cr\u{e8}me");
        assert!(
            result
                .warnings
                .iter()
                .any(|w| matches!(w.kind, WarningKind::DecodeFallback(_)))
        );
    }

    #[test]
    fn test_missing_container() {
        let epub = create_test_epub(&[("OEBPS/content.opf", b"<package/>")]);
        let err = extract_epub(&epub).unwrap_err();
        assert!(matches!(err, ExtractError::MissingContainer));
        assert_eq!(err.to_string(), "EPUB is missing container.xml");
    }

    #[test]
    fn test_missing_rootfile_entry() {
        let epub = create_test_epub(&[("META-INF/container.xml", CONTAINER.as_bytes())]);
        assert!(matches!(
            extract_epub(&epub).unwrap_err(),
            ExtractError::MissingRootfile
        ));
    }

    #[test]
    fn test_no_readable_text() {
        let opf = opf(
            r#"<item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>"#,
            r#"><itemref idref="c1"/>"#,
        );
        let epub = create_test_epub(&[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/c1.xhtml", b"<html><body><img src=\"x.png\"/></body></html>"),
        ]);
        let err = extract_epub(&epub).unwrap_err();
        assert_eq!(err.to_string(), "EPUB had no readable text");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_epub(b"PK but not really").unwrap_err(),
            ExtractError::InvalidArchive(_)
        ));
    }
}
