//! Display tokens.

use crate::PauseWeights;

/// Apostrophes kept inside a word core ("don't", "it’s").
const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];
/// Hyphens kept inside a word core ("well-known"), including the non-breaking hyphen.
const HYPHENS: [char; 2] = ['-', '\u{2011}'];

/// One unit of rapid serial visual presentation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Alphanumerics plus apostrophes/hyphens flanked by alphanumerics.
    pub core: String,
    /// Leading non-alphanumeric run of the source chunk.
    pub prefix: String,
    /// Trailing non-alphanumeric run of the source chunk.
    pub suffix: String,
    /// Character offset into `core` to align on screen.
    #[cfg_attr(feature = "serde", serde(rename = "orp_index"))]
    pub fixation_index: usize,
    /// Display time relative to a plain word.
    #[cfg_attr(feature = "serde", serde(rename = "pause_mult"))]
    pub pause_multiplier: f64,
}

impl Token {
    /// Length of the core in characters.
    pub fn core_len(&self) -> usize {
        self.core.chars().count()
    }

    /// The character at the fixation index.
    pub fn fixation_char(&self) -> Option<char> {
        self.core.chars().nth(self.fixation_index)
    }
}

/// Split one whitespace-free chunk with the default pause weights.
pub fn split_token(raw: &str) -> Option<Token> {
    split_token_with_weights(raw, &PauseWeights::default())
}

/// Split one whitespace-free chunk into a token.
///
/// Returns `None` when the chunk has no alphanumeric character.
pub fn split_token_with_weights(raw: &str, weights: &PauseWeights) -> Option<Token> {
    let (first, _) = raw.char_indices().find(|(_, c)| c.is_alphanumeric())?;
    let (last, last_char) = raw.char_indices().rev().find(|(_, c)| c.is_alphanumeric())?;
    let end = last + last_char.len_utf8();

    let suffix = &raw[end..];
    let core = filter_core(&raw[first..end]);
    let core_len = core.chars().count();

    Some(Token {
        fixation_index: fixation_index(core_len),
        pause_multiplier: weights.pause_multiplier(core_len, suffix),
        prefix: raw[..first].to_string(),
        suffix: suffix.to_string(),
        core,
    })
}

/// Optimal recognition point for a core of `len` characters.
///
/// Coarse length bands, clamped to the last character.
pub fn fixation_index(len: usize) -> usize {
    let band = match len {
        0..=1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    };
    band.min(len.saturating_sub(1))
}

fn filter_core(span: &str) -> String {
    let chars: Vec<char> = span.chars().collect();
    let alnum_at = |i: usize| chars.get(i).is_some_and(|c| c.is_alphanumeric());

    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            c.is_alphanumeric()
                || ((APOSTROPHES.contains(&c) || HYPHENS.contains(&c))
                    && i > 0
                    && alnum_at(i - 1)
                    && alnum_at(i + 1))
        })
        .map(|(_, &c)| c)
        .collect()
}
