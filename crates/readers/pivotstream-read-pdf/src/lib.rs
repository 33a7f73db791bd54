//! PDF reader for pivotstream.
//!
//! Extracts page text with `pdf-extract` and joins it into one normalized
//! reading text.
//!
//! # Limitations
//!
//! PDF is a layout format. The text capability exposes no outline, so
//! sections are inferred from numbered heading lines by
//! [`extract_pdf_sections`]. Scanned pages without a text layer yield no
//! text.

mod sections;

use std::panic;

use pivotstream_core::{
    ChapterMarker, ExtractError, ExtractOptions, ExtractWarning, Extracted, Format, Result,
    Severity, WarningKind, normalize,
};
use pivotstream_tokenize::count_tokens;

pub use sections::{extract_pdf_sections, extract_pdf_sections_with_options};

/// Text of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Normalized text of all non-empty pages, separated by blank lines.
    pub text: String,
    /// Number of pages in the document, empty ones included.
    pub page_count: usize,
    /// One `Page N` marker per non-empty page.
    pub pages: Vec<ChapterMarker>,
}

/// Extract text from PDF bytes.
pub fn extract_pdf(input: &[u8]) -> Result<Extracted<PdfText>> {
    extract_pdf_with_options(input, &ExtractOptions::default())
}

/// Extract text from PDF bytes with options.
pub fn extract_pdf_with_options(
    input: &[u8],
    _options: &ExtractOptions,
) -> Result<Extracted<PdfText>> {
    let raw_pages = read_pages(input)?;
    if raw_pages.is_empty() {
        return Err(ExtractError::InvalidFile("document has no pages".into()));
    }

    let mut warnings = Vec::new();
    let mut texts = Vec::new();
    let mut pages = Vec::new();
    let mut next_token = 0;

    for (index, raw) in raw_pages.iter().enumerate() {
        let number = index + 1;
        let text = normalize(raw);
        if text.is_empty() {
            log::debug!("page {number} has no text");
            warnings.push(ExtractWarning::new(
                Severity::Info,
                WarningKind::EmptyPage(number),
                format!("page {number} has no extractable text"),
            ));
            continue;
        }

        pages.extend(ChapterMarker::new(&format!("Page {number}"), next_token, 0));
        next_token += count_tokens(&text);
        texts.push(text);
    }

    let text = normalize(&texts.join("\n\n"));
    if text.is_empty() {
        return Err(ExtractError::NoReadableText(Format::Pdf));
    }

    Ok(Extracted::with_warnings(
        PdfText {
            text,
            page_count: raw_pages.len(),
            pages,
        },
        warnings,
    ))
}

/// Per-page text, with parser panics turned into errors.
fn read_pages(input: &[u8]) -> Result<Vec<String>> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(input)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractError::InvalidFile(e.to_string())),
        Err(_) => Err(ExtractError::InvalidFile(
            "parser failed on malformed input".into(),
        )),
    }
}
