//! # Error Types
//!
//! This module defines the error taxonomy for the highlight engine.
//!
//! Most of these errors never reach the host UI. Segmentation, timing and
//! annotation failures are recovered inside the component that detects them
//! (with a `tracing` event) and replaced by a safe fallback. Only playback
//! failures and configuration errors are returned to callers.
//!
//! ## Error Types
//! - `SegmentationUnavailable` - locale-aware segmentation cannot serve a locale
//! - `MalformedTiming` - exact timing is empty or inconsistent
//! - `RenderEnvironmentUnavailable` - annotation requested in a headless context
//! - `Markup` - the markup could not be tokenized
//! - `Playback` - the audio source failed; shown to the user
//! - `InvalidTransition` - a lifecycle event that the current state does not accept
//! - `Config` - invalid YAML configuration

use thiserror::Error;

use crate::playback::PlaybackStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HighlightError {
    /// Locale-aware segmentation cannot handle the requested locale.
    ///
    /// Recovered by the segmenter, which falls back to whitespace splitting.
    ///
    /// # Example
    /// ```
    /// # use readalong::HighlightError;
    /// let err = HighlightError::SegmentationUnavailable { locale: "12".to_string() };
    /// assert_eq!(err.to_string(), "Locale-aware segmentation unavailable for locale '12'");
    /// ```
    #[error("Locale-aware segmentation unavailable for locale '{locale}'")]
    SegmentationUnavailable { locale: String },

    /// Exact timing entries are empty or inconsistent.
    ///
    /// Recovered by the timeline, which switches to estimated mode.
    #[error("Malformed timing: {0}")]
    MalformedTiming(String),

    /// Annotation was requested where no document can be rendered.
    #[error("Render environment unavailable")]
    RenderEnvironmentUnavailable,

    /// The markup could not be tokenized.
    ///
    /// `position` is a byte offset into the markup.
    #[error("Markup error at byte {position}: {message}")]
    Markup { position: usize, message: String },

    /// The audio source failed to load or play.
    ///
    /// # Example
    /// ```
    /// # use readalong::HighlightError;
    /// let err = HighlightError::Playback("speech service unavailable".to_string());
    /// assert_eq!(err.to_string(), "Playback error: speech service unavailable");
    /// ```
    #[error("Playback error: {0}")]
    Playback(String),

    /// A lifecycle event arrived in a state that does not accept it.
    #[error("Cannot {event} while {from}")]
    InvalidTransition {
        from: PlaybackStatus,
        event: &'static str,
    },

    /// Invalid configuration value or unreadable configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
