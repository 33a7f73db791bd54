//! Plain-text normalization.
//!
//! Every reader funnels its output through [`normalize`] so that token
//! indices computed on per-unit text agree with indices on the joined
//! document.

use quick_xml::escape::resolve_html5_entity;

/// Longest character reference we try to resolve, `&` and `;` excluded.
const MAX_ENTITY_LEN: usize = 32;

/// Canonicalize extracted text.
///
/// Decodes character references, turns carriage returns into line feeds,
/// collapses horizontal whitespace to single spaces, drops spaces at line
/// edges, limits blank runs to one empty line, and trims the result.
/// Applying it twice gives the same output as applying it once.
pub fn normalize(text: &str) -> String {
    let mut decoded = text.to_string();
    while let Some(next) = decode_pass(&decoded) {
        decoded = next;
    }
    collapse_layout(&decoded)
}

/// Decode HTML character references once.
///
/// Named HTML5 entities and decimal/hex numeric references are resolved;
/// anything unknown or unterminated is kept verbatim.
pub fn decode_entities(text: &str) -> String {
    decode_pass(text).unwrap_or_else(|| text.to_string())
}

/// One decoding pass, `None` when nothing was replaced.
fn decode_pass(text: &str) -> Option<String> {
    if !text.contains('&') {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let resolved = tail
            .bytes()
            .take(MAX_ENTITY_LEN + 1)
            .position(|b| b == b';')
            .filter(|&end| end > 0)
            .and_then(|end| resolve_reference(&tail[..end]).map(|r| (r, end)));

        match resolved {
            Some((replacement, end)) => {
                out.push_str(&replacement);
                rest = &tail[end + 1..];
                changed = true;
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    changed.then_some(out)
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let ch = match char::from_u32(code) {
            Some('\0') | None => char::REPLACEMENT_CHARACTER,
            Some(c) => c,
        };
        return Some(ch.to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    resolve_html5_entity(name).map(str::to_string)
}

fn collapse_layout(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut newlines = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(mut ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            ch = '\n';
        }

        if ch == '\n' {
            newlines += 1;
            pending_space = false;
            continue;
        }
        if ch.is_whitespace() {
            if newlines == 0 {
                pending_space = true;
            }
            continue;
        }

        if !out.is_empty() {
            match newlines {
                0 if pending_space => out.push(' '),
                0 => {}
                1 => out.push('\n'),
                _ => out.push_str("\n\n"),
            }
        }
        newlines = 0;
        pending_space = false;
        out.push(ch);
    }

    out
}
