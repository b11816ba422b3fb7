//! # Playback Module
//!
//! Lifecycle of the audio source behind a read-aloud.
//!
//! ## Purpose
//! The audio element reports its own events (`play`, `pause`, `ended`,
//! `error`, `timeupdate`) and the UI issues explicit pause/resume/stop
//! calls. This module turns both into one state machine, hands the timing
//! projector a [`PlaybackClock`](crate::PlaybackClock) snapshot, and clears
//! highlights whenever playback returns to idle.
//!
//! ## Sub-modules
//! - `state` - PlaybackStatus, PlaybackEvent, PlaybackState, PlaybackAdapter
//! - `session` - ReadingSession, one live source per session
//!
//! ## States
//! - `idle` - nothing loaded; no highlight
//! - `loading` - audio requested, not yet playing
//! - `playing` / `paused` - clock is live
//! - `error` - the source failed; the message is kept for display and the
//!   engine does not retry on its own
//!
//! ## Example
//! ```rust
//! use readalong::playback::{PlaybackEvent, ReadingSession};
//! use readalong::{HighlightConfig, SourceKind};
//!
//! let mut session = ReadingSession::new(HighlightConfig::default());
//! session.add_block("The quick brown fox", SourceKind::Plain);
//!
//! let source = session.start_read().unwrap();
//! session.handle(source, PlaybackEvent::Started { duration: 2.0 }).unwrap();
//! session.time_update(source, 0.1, 2.0);
//!
//! let highlights = session.tick_all();
//! assert_eq!(highlights[0].active_index, Some(0));
//! ```
//!
//! ## Related Modules
//! - `highlighter` - reset on stop and end
//! - `timing` - consumes the clock snapshot

mod session;
mod state;


pub use session::{ReadingSession, SourceId};
pub use state::{PlaybackAdapter, PlaybackEvent, PlaybackState, PlaybackStatus};
