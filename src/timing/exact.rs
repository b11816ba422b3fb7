//! Exact-mode projection
//!
//! Uses word timestamps supplied by a speech provider.

use crate::error::HighlightError;

use super::types::{PlaybackClock, TimingEntry};

/// Project the clock onto provider timing.
///
/// Returns the entry whose `[start, end)` range holds the current time. In a
/// gap between entries, or after the last entry has ended, the most recent
/// entry that has started stays active so the highlight does not vanish
/// before playback stops. Before the first entry starts nothing is active.
///
/// # Example
/// ```rust
/// use readalong::{project_exact, PlaybackClock, TimingEntry};
///
/// let timing = vec![
///     TimingEntry::new("Hi", 0.0, 0.5),
///     TimingEntry::new("there", 0.5, 1.2),
/// ];
/// assert_eq!(project_exact(&timing, &PlaybackClock::playing(0.8, 1.2)), Some(1));
/// assert_eq!(project_exact(&timing, &PlaybackClock::playing(5.0, 1.2)), Some(1));
/// ```
pub fn project_exact(entries: &[TimingEntry], clock: &PlaybackClock) -> Option<usize> {
    if entries.is_empty() || !clock.is_engaged() {
        return None;
    }
    let time = clock.current_time;
    if !time.is_finite() {
        return None;
    }

    entries
        .iter()
        .position(|e| e.contains(time))
        .or_else(|| entries.iter().rposition(|e| e.start <= time))
}

/// Check that timing can drive exact mode.
///
/// Entries must be non-empty, finite, have `end >= start`, and be ordered by
/// start time. Gaps and touching entries are fine.
pub fn validate_timing(entries: &[TimingEntry]) -> Result<(), HighlightError> {
    if entries.is_empty() {
        return Err(HighlightError::MalformedTiming("no timing entries".to_string()));
    }

    for (i, entry) in entries.iter().enumerate() {
        if !entry.start.is_finite() || !entry.end.is_finite() {
            return Err(HighlightError::MalformedTiming(format!(
                "entry {} ('{}') has a non-finite timestamp",
                i, entry.text
            )));
        }
        if entry.end < entry.start {
            return Err(HighlightError::MalformedTiming(format!(
                "entry {} ('{}') ends at {} before it starts at {}",
                i, entry.text, entry.end, entry.start
            )));
        }
        if i > 0 && entry.start < entries[i - 1].start {
            return Err(HighlightError::MalformedTiming(format!(
                "entry {} ('{}') starts at {} before the previous entry",
                i, entry.text, entry.start
            )));
        }
    }

    Ok(())
}
