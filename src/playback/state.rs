//! Lifecycle state machine
//!
//! ```text
//! idle --request--> loading --started--> playing <--pause/resume--> paused
//!   ^                  |                    |                          |
//!   +------stop--------+-----stop/ended-----+--------stop/ended--------+
//!                      |                    |
//!                      +------failed--------+--> error --request--> loading
//! ```

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::HighlightError;
use crate::timing::PlaybackClock;

/// Where the audio source is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Error,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loading => "loading",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Native audio events and explicit UI calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaybackEvent {
    /// The user asked for read-aloud; audio is being fetched
    Request,
    /// Audio began playing; duration in seconds
    Started { duration: f64 },
    Pause,
    Resume,
    Stop,
    /// Audio reached its end
    Ended,
    /// The audio source failed
    Failed { message: String },
}

impl PlaybackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackEvent::Request => "request",
            PlaybackEvent::Started { .. } => "start",
            PlaybackEvent::Pause => "pause",
            PlaybackEvent::Resume => "resume",
            PlaybackEvent::Stop => "stop",
            PlaybackEvent::Ended => "end",
            PlaybackEvent::Failed { .. } => "fail",
        }
    }
}

/// Observable playback state, as the UI layer renders it.
///
/// Serializes with the derived `isPlaying`, `isPaused` and `isLoading`
/// flags alongside the stored fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub current_time: f64,
    pub duration: f64,
    /// User-displayable message while in the error state
    pub error: Option<String>,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.status == PlaybackStatus::Paused
    }

    pub fn is_loading(&self) -> bool {
        self.status == PlaybackStatus::Loading
    }

    /// Snapshot for the timing projector.
    pub fn clock(&self) -> PlaybackClock {
        PlaybackClock {
            current_time: self.current_time,
            duration: self.duration,
            is_playing: self.is_playing(),
            is_paused: self.is_paused(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateView<'a> {
    status: PlaybackStatus,
    current_time: f64,
    duration: f64,
    is_playing: bool,
    is_paused: bool,
    is_loading: bool,
    error: Option<&'a str>,
}

impl Serialize for PlaybackState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StateView {
            status: self.status,
            current_time: self.current_time,
            duration: self.duration,
            is_playing: self.is_playing(),
            is_paused: self.is_paused(),
            is_loading: self.is_loading(),
            error: self.error.as_deref(),
        }
        .serialize(serializer)
    }
}

/// Drives [`PlaybackState`] from lifecycle events.
///
/// Illegal events are rejected with [`HighlightError::InvalidTransition`]
/// and leave the state untouched.
///
/// # Example
/// ```rust
/// use readalong::playback::{PlaybackAdapter, PlaybackEvent, PlaybackStatus};
///
/// let mut adapter = PlaybackAdapter::new();
/// adapter.apply(PlaybackEvent::Request).unwrap();
/// adapter.apply(PlaybackEvent::Started { duration: 4.0 }).unwrap();
/// adapter.time_update(1.5, 4.0);
/// assert_eq!(adapter.state().clock().current_time, 1.5);
///
/// adapter.apply(PlaybackEvent::Stop).unwrap();
/// assert_eq!(adapter.status(), PlaybackStatus::Idle);
/// assert_eq!(adapter.state().current_time, 0.0);
///
/// assert!(adapter.apply(PlaybackEvent::Pause).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlaybackAdapter {
    state: PlaybackState,
}

impl PlaybackAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn apply(&mut self, event: PlaybackEvent) -> Result<(), HighlightError> {
        use PlaybackStatus::*;

        let from = self.state.status;
        let invalid = || HighlightError::InvalidTransition {
            from,
            event: event.name(),
        };

        match (&event, from) {
            (PlaybackEvent::Request, Idle | Error) => {
                self.state = PlaybackState {
                    status: Loading,
                    ..PlaybackState::default()
                };
            }
            (PlaybackEvent::Started { duration }, Loading) => {
                self.state.status = Playing;
                self.state.duration = sanitize(*duration);
                self.state.current_time = 0.0;
            }
            (PlaybackEvent::Pause, Playing) => self.state.status = Paused,
            (PlaybackEvent::Resume, Paused) => self.state.status = Playing,
            (PlaybackEvent::Stop, _) => {
                self.reset();
                return Ok(());
            }
            (PlaybackEvent::Ended, Playing | Paused) => {
                self.state = PlaybackState {
                    duration: self.state.duration,
                    ..PlaybackState::default()
                };
            }
            (PlaybackEvent::Failed { message }, Loading | Playing) => {
                warn!(error = %message, from = %from, "playback failed");
                self.state = PlaybackState {
                    status: Error,
                    error: Some(HighlightError::Playback(message.clone()).to_string()),
                    ..PlaybackState::default()
                };
            }
            _ => return Err(invalid()),
        }

        debug!(event = event.name(), from = %from, to = %self.state.status, "playback transition");
        Ok(())
    }

    /// Return to idle from any state, keeping the last known duration.
    ///
    /// This is the `Stop` transition; it cannot fail.
    pub fn reset(&mut self) {
        let from = self.state.status;
        self.state = PlaybackState {
            duration: self.state.duration,
            ..PlaybackState::default()
        };
        debug!(event = "stop", from = %from, to = %self.state.status, "playback transition");
    }

    /// Apply a `timeupdate` from the audio element.
    ///
    /// Ignored unless audio is playing or paused. Non-finite or negative
    /// values are treated as zero.
    pub fn time_update(&mut self, current_time: f64, duration: f64) {
        if !matches!(self.state.status, PlaybackStatus::Playing | PlaybackStatus::Paused) {
            debug!(status = %self.state.status, "ignoring time update");
            return;
        }
        self.state.current_time = sanitize(current_time);
        self.state.duration = sanitize(duration);
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
