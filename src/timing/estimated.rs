//! Estimated-mode projection
//!
//! Spreads the playback duration over the spoken tokens in proportion to
//! their weights and picks the token the clock currently falls in.

use crate::segment::Token;

use super::types::PlaybackClock;

/// Project the clock onto a weighted token sequence.
///
/// `weights` runs parallel to `tokens`; a missing, zero or non-finite weight
/// falls back to the token's own weight (and then to 1). Whitespace tokens
/// are skipped and never returned.
///
/// Returns `None` when the clock is not engaged, the duration is unknown, or
/// there is nothing to speak.
///
/// # Example
/// ```rust
/// use readalong::{project_estimated, segment, PlaybackClock};
///
/// let tokens = segment("Hello world!", None);
/// let weights: Vec<f64> = tokens.iter().map(|t| t.weight).collect();
///
/// let start = PlaybackClock::playing(0.0, 2.0);
/// let end = PlaybackClock::playing(2.0, 2.0);
/// assert_eq!(project_estimated(&tokens, &weights, &start), Some(0));
/// assert_eq!(project_estimated(&tokens, &weights, &end), Some(2));
/// ```
pub fn project_estimated(tokens: &[Token], weights: &[f64], clock: &PlaybackClock) -> Option<usize> {
    if !clock.is_engaged() {
        return None;
    }
    let progress = clock.progress()?;

    let effective = |i: usize, token: &Token| -> f64 {
        let w = weights.get(i).copied().unwrap_or(token.weight);
        if w.is_finite() && w > 0.0 {
            w
        } else if token.weight.is_finite() && token.weight > 0.0 {
            token.weight
        } else {
            1.0
        }
    };

    let total: f64 = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_whitespace)
        .map(|(i, t)| effective(i, t))
        .sum();
    if total <= 0.0 {
        return None;
    }

    let target = progress * total;
    let mut cumulative = 0.0;
    let mut last_spoken = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.is_whitespace {
            continue;
        }
        cumulative += effective(i, token);
        last_spoken = Some(i);
        if cumulative >= target {
            return Some(i);
        }
    }

    // Rounding can leave the final cumulative sum a hair under the target
    last_spoken
}
