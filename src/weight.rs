//! # Weight Model
//!
//! Assigns each token a relative speaking duration when no real word timing
//! is available. This is a best-effort estimate: longer words take longer to
//! say, and punctuation adds a pause.
//!
//! ## Variants
//! - [`weight`] - isolated token score: number of letter/digit graphemes,
//!   never less than 1
//! - [`sentence_weight`] - passage estimator: adds pauses for sentence and
//!   clause punctuation and a bonus for long words
//! - [`block_weight`] - word count of a whole paragraph, for line-level
//!   highlighting

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::segment::{segment, Token};

/// Which weight function drives estimated timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    /// Plain character count ([`weight`])
    Token,
    /// Character count plus punctuation pauses ([`sentence_weight`])
    #[default]
    Sentence,
}

/// Tunables for the sentence estimator, in "character" units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WeightConfig {
    pub sentence_pause: f64,
    pub clause_pause: f64,
    pub long_word_threshold: usize,
    pub long_word_bonus: f64,
    pub very_long_word_threshold: usize,
    pub very_long_word_bonus: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            sentence_pause: 3.0,
            clause_pause: 1.5,
            long_word_threshold: 6,
            long_word_bonus: 1.0,
            very_long_word_threshold: 10,
            very_long_word_bonus: 2.0,
        }
    }
}

/// Number of graphemes that contain a letter or digit.
///
/// Combining accents count with their base letter, so `"é"` is 1 whether it
/// is precomposed or not.
pub fn spoken_length(token: &str) -> usize {
    token
        .graphemes(true)
        .filter(|g| g.chars().any(char::is_alphanumeric))
        .count()
}

/// Base weight of a token: its spoken length, floored at 1.
///
/// # Example
/// ```rust
/// use readalong::weight;
///
/// assert_eq!(weight("hello!"), 5.0);
/// assert_eq!(weight("!!!"), 1.0);
/// ```
pub fn weight(token: &str) -> f64 {
    spoken_length(token).max(1) as f64
}

/// Passage estimator weight: base weight plus pause and length bonuses.
pub fn sentence_weight(token: &str, config: &WeightConfig) -> f64 {
    let length = spoken_length(token);
    let mut total = length.max(1) as f64;

    if length > config.long_word_threshold {
        total += config.long_word_bonus;
    }
    if length > config.very_long_word_threshold {
        total += config.very_long_word_bonus;
    }

    match trailing_punctuation(token) {
        Some('.' | '!' | '?' | '…' | '。' | '！' | '？') => total += config.sentence_pause,
        Some(',' | ';' | ':' | '、' | '，' | '；' | '：') => total += config.clause_pause,
        _ => {}
    }

    total
}

/// Word count of a block of text, floored at 1.
pub fn block_weight(text: &str) -> f64 {
    segment(text, None)
        .iter()
        .filter(|t| !t.is_whitespace)
        .count()
        .max(1) as f64
}

/// Weights for a token sequence, parallel to `tokens`. Whitespace weighs 0.
pub fn weigh_tokens(tokens: &[Token], estimator: Estimator, config: &WeightConfig) -> Vec<f64> {
    tokens
        .iter()
        .map(|t| {
            if t.is_whitespace {
                0.0
            } else {
                match estimator {
                    Estimator::Token => weight(&t.text),
                    Estimator::Sentence => sentence_weight(&t.text, config),
                }
            }
        })
        .collect()
}

/// Last character of the token, skipping closing quotes and brackets.
fn trailing_punctuation(token: &str) -> Option<char> {
    token
        .chars()
        .rev()
        .find(|c| !matches!(c, '"' | '\'' | ')' | ']' | '}' | '»' | '”' | '’' | '」' | '』'))
}
