//! # Timing Module
//!
//! Map the audio clock onto a text block and decide which unit is being
//! spoken.
//!
//! ## Purpose
//! Every `timeupdate` tick from the audio element produces a fresh
//! [`PlaybackClock`]. The projector turns that snapshot into an active index:
//! the position, in the block's unit sequence, of the word (or paragraph)
//! currently being read. The index is derived from scratch on every call, so
//! dropped or out-of-order ticks never leave stale state behind.
//!
//! ## Sub-modules
//! - `types` - PlaybackClock, TimingEntry, Granularity, Units
//! - `estimated` - weight-proportional projection
//! - `exact` - projection on provider word timestamps
//! - `timeline` - picks a mode and maps word timing onto units
//!
//! ## Two Modes
//!
//! ### Estimated
//! - No ground truth; the duration is split in proportion to unit weights
//! - Index never moves backwards while time moves forwards
//! - `duration == 0` or a disengaged clock gives no highlight
//!
//! ### Exact
//! - Provider entries `{ text, start, end }`, one per spoken word
//! - Past the last entry the last word stays highlighted
//! - Empty or inconsistent timing silently falls back to estimated mode
//!
//! ## Granularity
//! The same projection serves word-level and block-level highlighting; only
//! the units and their weights differ (characters per word vs. words per
//! block).
//!
//! ## Related Modules
//! - `segment` - produces word units
//! - `weight` - produces unit weights
//! - `annotate` - renders the active index

mod types;
mod estimated;
mod exact;
mod timeline;


pub use types::{Granularity, PlaybackClock, TimingEntry, Units};
pub use estimated::project_estimated;
pub use exact::{project_exact, validate_timing};
pub use timeline::{Mode, Timeline};
