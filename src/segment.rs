//! # Word Segmenter
//!
//! Splits raw text into tokens that can be highlighted one at a time.
//!
//! ## Strategies
//! - **Whitespace runs** (default for spaced scripts): every maximal run of
//!   whitespace and every maximal run of non-whitespace becomes a token, so
//!   punctuation stays attached to its word (`"world!"`).
//! - **Unicode word bounds** (scripts without spaces, e.g. Chinese, Japanese,
//!   Thai): UAX #29 word boundaries, with punctuation-only segments folded
//!   into the neighbouring word.
//!
//! The strategy is picked from the locale when one is given, otherwise from
//! the script of the text. A locale that cannot be resolved degrades to
//! whitespace runs.
//!
//! ## Reconstruction
//! Whitespace is never discarded. Concatenating `token.text` over the output
//! of [`segment`] always reproduces the input exactly.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::HighlightError;
use crate::weight::weight;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|\S+").expect("Invalid whitespace run regex"));

/// A segmented unit of text.
///
/// `start_offset` is a byte offset into the source the token was cut from
/// and `source_len` is the length of that source span. They differ from
/// `text.len()` only when `text` was decoded from markup (`&amp;` is
/// spoken as `&`). Whitespace tokens carry a weight of zero and are never
/// highlighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub start_offset: usize,
    pub source_len: usize,
    pub weight: f64,
    pub is_whitespace: bool,
}

impl Token {
    pub fn new(text: &str, start_offset: usize) -> Self {
        Self::spanning(text, start_offset, text.len())
    }

    /// A token whose text stands for `source_len` bytes of source.
    pub fn spanning(text: &str, start_offset: usize, source_len: usize) -> Self {
        let is_whitespace = text.chars().all(char::is_whitespace);
        Self {
            text: text.to_string(),
            start_offset,
            source_len,
            weight: if is_whitespace { 0.0 } else { weight(text) },
            is_whitespace,
        }
    }

    /// Byte offset one past the end of the token's source span.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.source_len
    }
}

/// A resolved language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
}

impl Locale {
    /// Parse a BCP-47 style tag (`"en"`, `"zh-Hant"`, `"pt_BR"`).
    ///
    /// Only the primary language subtag is kept. It must be 2 to 8 ASCII
    /// letters.
    pub fn parse(tag: &str) -> Result<Self, HighlightError> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        let valid = (2..=8).contains(&primary.len())
            && primary.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(HighlightError::SegmentationUnavailable {
                locale: tag.to_string(),
            });
        }
        Ok(Self {
            language: primary.to_ascii_lowercase(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Languages whose scripts do not separate words with spaces.
    pub fn is_unspaced(&self) -> bool {
        matches!(
            self.language.as_str(),
            "zh" | "ja" | "th" | "lo" | "km" | "my" | "bo" | "yue" | "wuu" | "cmn"
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    WhitespaceRuns,
    WordBounds,
}

impl Strategy {
    fn select(text: &str, locale: Option<&str>) -> Self {
        if let Some(tag) = locale {
            match Locale::parse(tag) {
                Ok(locale) if locale.is_unspaced() => return Strategy::WordBounds,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "falling back to whitespace segmentation");
                    return Strategy::WhitespaceRuns;
                }
            }
        }
        if contains_unspaced_script(text) {
            Strategy::WordBounds
        } else {
            Strategy::WhitespaceRuns
        }
    }
}

/// Segment `text` into word and whitespace tokens.
///
/// Never fails: an unusable locale falls back to whitespace splitting.
///
/// # Example
/// ```rust
/// use readalong::segment;
///
/// let tokens = segment("Hello world!", None);
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, vec!["Hello", " ", "world!"]);
/// ```
pub fn segment(text: &str, locale: Option<&str>) -> Vec<Token> {
    if text.is_empty() {
        return Vec::new();
    }
    match Strategy::select(text, locale) {
        Strategy::WhitespaceRuns => split_whitespace_runs(text),
        Strategy::WordBounds => split_word_bounds(text),
    }
}

/// Indices of the tokens that can be highlighted (non-whitespace).
pub fn spoken_indices(tokens: &[Token]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_whitespace)
        .map(|(i, _)| i)
        .collect()
}

fn split_whitespace_runs(text: &str) -> Vec<Token> {
    WHITESPACE_RUNS
        .find_iter(text)
        .map(|m| Token::new(m.as_str(), m.start()))
        .collect()
}

fn split_word_bounds(text: &str) -> Vec<Token> {
    // (start, end, is_whitespace, punctuation_only)
    let mut spans: Vec<(usize, usize, bool, bool)> = Vec::new();

    for (start, piece) in text.split_word_bound_indices() {
        let end = start + piece.len();
        let is_whitespace = piece.chars().all(char::is_whitespace);
        let is_punctuation = !is_whitespace && !piece.chars().any(char::is_alphanumeric);

        match spans.last_mut() {
            // Merge adjacent whitespace into a single run
            Some(last) if is_whitespace && last.2 => last.1 = end,
            // Trailing punctuation joins the word before it; a word joins
            // leading punctuation such as an opening quote
            Some(last) if !is_whitespace && !last.2 && (is_punctuation || last.3) => {
                last.1 = end;
                last.3 = last.3 && is_punctuation;
            }
            _ => spans.push((start, end, is_whitespace, is_punctuation)),
        }
    }

    spans
        .into_iter()
        .map(|(start, end, _, _)| Token::new(&text[start..end], start))
        .collect()
}

/// True when the text contains characters from scripts written without
/// spaces between words.
fn contains_unspaced_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x3040..=0x30FF      // Hiragana, Katakana
            | 0x3400..=0x4DBF    // CJK Extension A
            | 0x4E00..=0x9FFF    // CJK Unified Ideographs
            | 0xF900..=0xFAFF    // CJK Compatibility Ideographs
            | 0x20000..=0x2FA1F  // CJK Extensions B-F
            | 0x0E00..=0x0EFF    // Thai, Lao
            | 0x1000..=0x109F    // Myanmar
            | 0x1780..=0x17FF    // Khmer
            | 0x0F00..=0x0FFF    // Tibetan
        )
    })
}
