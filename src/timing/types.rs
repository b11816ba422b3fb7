//! Timing type definitions
//!
//! The clock snapshot read by the projector, provider-supplied word timing,
//! and the unit sequence a timeline projects onto.

use serde::{Deserialize, Serialize};

use crate::segment::Token;

/// Read-only snapshot of the audio clock.
///
/// Times are in seconds. A clock is *engaged* while audio is playing, or
/// paused somewhere after the start; only an engaged clock produces a
/// highlight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackClock {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub is_paused: bool,
}

impl PlaybackClock {
    pub fn playing(current_time: f64, duration: f64) -> Self {
        Self {
            current_time,
            duration,
            is_playing: true,
            is_paused: false,
        }
    }

    pub fn paused(current_time: f64, duration: f64) -> Self {
        Self {
            current_time,
            duration,
            is_playing: false,
            is_paused: true,
        }
    }

    pub fn stopped(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            is_playing: false,
            is_paused: false,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.is_playing || (self.is_paused && self.current_time > 0.0)
    }

    /// `current_time / duration` clamped to `[0, 1]`, or `None` when the
    /// duration is unknown or zero.
    pub fn progress(&self) -> Option<f64> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return None;
        }
        let time = if self.current_time.is_finite() {
            self.current_time
        } else {
            0.0
        };
        Some((time / self.duration).clamp(0.0, 1.0))
    }
}

/// One spoken word with provider timestamps, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TimingEntry {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// What a single highlight covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One word at a time
    #[default]
    Word,
    /// One paragraph, heading or list item at a time
    Block,
}

/// The addressable units of one text block.
///
/// `tokens` is the sequence an active index points into; whitespace entries
/// are kept so indices line up with the rendered output. `word_units[i]` is
/// the index in `tokens` of the unit holding the `i`-th spoken word, which is
/// how exact word timing is mapped onto block-level units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Units {
    pub tokens: Vec<Token>,
    pub word_units: Vec<usize>,
}

impl Units {
    /// Units where every non-whitespace token is its own word.
    pub fn from_words(tokens: Vec<Token>) -> Self {
        let word_units = crate::segment::spoken_indices(&tokens);
        Self { tokens, word_units }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|t| t.is_whitespace)
    }
}
