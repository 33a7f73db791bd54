//! Section inference from numbered heading lines.
//!
//! PDF text carries no structure, so headings are recognised by their
//! ordinal prefix: `2.1 Problem Statement`, `3 Results`, `IV. Conclusion`,
//! `A. Appendix`. The rules are tuned to reject the numbers and letters
//! that start ordinary prose lines.

use std::sync::OnceLock;

use pivotstream_core::{ChapterMarker, ExtractOptions, collapse_whitespace};
use pivotstream_tokenize::count_tokens;
use regex::Regex;

static PREFIX_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn prefix_regex() -> Option<&'static Regex> {
    PREFIX_REGEX
        .get_or_init(|| {
            Regex::new(concat!(
                r"^(?:",
                r"(?P<lead>\d+)(?P<frac>(?:\.\d+)+)\.?",
                r"|(?P<int>\d{1,3})\.?",
                r"|(?P<roman>M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})",
                r"|m{0,3}(?:cm|cd|d?c{0,3})(?:xc|xl|l?x{0,3})(?:ix|iv|v?i{0,3}))\.?",
                r"|(?P<letter>[A-Z])\.?",
                r")$"
            ))
            .ok()
        })
        .as_ref()
}

/// Infer section markers with default options.
pub fn extract_pdf_sections(text: &str) -> Vec<ChapterMarker> {
    extract_pdf_sections_with_options(text, &ExtractOptions::default())
}

/// Infer section markers from extracted PDF text.
///
/// Each marker's index is the token count of all lines before its
/// heading line. Never fails; text without headings yields nothing.
pub fn extract_pdf_sections_with_options(
    text: &str,
    options: &ExtractOptions,
) -> Vec<ChapterMarker> {
    let Some(regex) = prefix_regex() else {
        return Vec::new();
    };

    let mut sections = Vec::new();
    let mut tokens_before = 0;
    for line in text.lines() {
        if let Some(title) = heading_title(regex, line.trim(), options.section_max_line_chars) {
            log::trace!("section heading {title:?} at token {tokens_before}");
            sections.extend(ChapterMarker::new(&title, tokens_before, 0));
        }
        tokens_before += count_tokens(line);
    }
    sections
}

/// `"<prefix> <title>"` when `line` reads as a numbered heading.
fn heading_title(regex: &Regex, line: &str, max_chars: usize) -> Option<String> {
    if line.chars().count() > max_chars {
        return None;
    }

    let (prefix, rest) = line.split_once(char::is_whitespace)?;
    let title = collapse_whitespace(rest);
    // Prose continues in lowercase; caseless scripts and quotes pass.
    let first_letter = title.chars().find(|c| c.is_alphabetic())?;
    if first_letter.is_lowercase() {
        return None;
    }

    let caps = regex.captures(prefix)?;
    if let (Some(lead), Some(frac)) = (caps.name("lead"), caps.name("frac")) {
        // `136.01` reads as a quantity, `2.1` and `1.2.10` as section numbers.
        let single_level = frac.as_str().matches('.').count() == 1;
        if single_level && frac.len() > 2 {
            return None;
        }
        if is_zero(lead.as_str()) {
            return None;
        }
    } else if let Some(int) = caps.name("int") {
        if is_zero(int.as_str()) {
            return None;
        }
    } else if caps.name("roman").is_some_and(|m| m.as_str().is_empty()) {
        return None;
    }

    Some(format!("{} {title}", prefix.trim_end_matches('.')))
}

fn is_zero(digits: &str) -> bool {
    digits.bytes().all(|b| b == b'0')
}
