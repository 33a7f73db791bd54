//! Pause weighting.

/// Pause multipliers applied to a token's display time.
///
/// Punctuation in the suffix selects a single tier (strong beats medium
/// beats light, no stacking). Long words get an extra bonus on top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PauseWeights {
    /// Sentence end: `.`, `!`, `?`.
    pub strong: f64,
    /// Clause break: `:`, `;`.
    pub medium: f64,
    /// Comma.
    pub light: f64,
    /// Bonus per started group of 4 characters beyond 8.
    pub long_word_step: f64,
    /// Upper bound on the long-word bonus.
    pub long_word_cap: f64,
}

impl Default for PauseWeights {
    fn default() -> Self {
        Self {
            strong: 2.2,
            medium: 1.8,
            light: 1.5,
            long_word_step: 0.1,
            long_word_cap: 0.5,
        }
    }
}

/// Words up to this many characters get no length bonus.
const LONG_WORD_THRESHOLD: usize = 8;

impl PauseWeights {
    /// Multiplier for a core of `core_len` characters followed by `suffix`.
    ///
    /// Rounded to three decimals.
    pub fn pause_multiplier(&self, core_len: usize, suffix: &str) -> f64 {
        let punct = if suffix.contains(['.', '!', '?']) {
            self.strong
        } else if suffix.contains([':', ';']) {
            self.medium
        } else if suffix.contains(',') {
            self.light
        } else {
            1.0
        };

        let extra = core_len.saturating_sub(LONG_WORD_THRESHOLD);
        let bonus = if extra > 0 {
            (self.long_word_step * extra.div_ceil(4) as f64).min(self.long_word_cap)
        } else {
            0.0
        };

        round3(punct * (1.0 + bonus))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
