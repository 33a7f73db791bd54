//! RSVP tokenizer for pivotstream.
//!
//! Splits text on whitespace and turns every chunk that contains at least
//! one alphanumeric character into a [`Token`]: the word core to display,
//! the punctuation around it, the character to fixate on, and how long to
//! linger on it.
//!
//! # Example
//!
//! ```
//! use pivotstream_tokenize::tokenize;
//!
//! let tokens = tokenize("*** Hello, world! ***");
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].core, "Hello");
//! assert_eq!(tokens[0].suffix, ",");
//! assert!(tokens[1].pause_multiplier > tokens[0].pause_multiplier);
//! ```

mod token;
mod weights;

pub use token::*;
pub use weights::*;

/// Tokenize text with the default pause weights.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_weights(text, &PauseWeights::default())
}

/// Tokenize text with custom pause weights.
pub fn tokenize_with_weights(text: &str, weights: &PauseWeights) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| split_token_with_weights(raw, weights))
        .collect()
}

/// Number of tokens [`tokenize`] would produce for `text`.
///
/// Readers use this to place chapter markers without materializing tokens.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace()
        .filter(|raw| raw.chars().any(char::is_alphanumeric))
        .count()
}
