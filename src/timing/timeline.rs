//! Mode selection
//!
//! A [`Timeline`] holds the units of one text block and decides, once, whether
//! projection runs on provider timing or on estimated weights.

use tracing::debug;

use crate::weight::{weigh_tokens, Estimator, WeightConfig};

use super::estimated::project_estimated;
use super::exact::{project_exact, validate_timing};
use super::types::{PlaybackClock, TimingEntry, Units};

/// Which projection a timeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Estimated,
    Exact,
}

/// Units, their weights, and optional provider timing for one text block.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    units: Units,
    weights: Vec<f64>,
    timing: Option<Vec<TimingEntry>>,
}

impl Timeline {
    /// Estimated-mode timeline with explicit weights (parallel to the units).
    pub fn new(units: Units, weights: Vec<f64>) -> Self {
        Self {
            units,
            weights,
            timing: None,
        }
    }

    /// Estimated-mode timeline weighted by one of the word estimators.
    pub fn estimated(units: Units, estimator: Estimator, config: &WeightConfig) -> Self {
        let weights = weigh_tokens(&units.tokens, estimator, config);
        Self::new(units, weights)
    }

    /// Switch to exact mode if `entries` are usable; otherwise stay estimated.
    pub fn with_timing(mut self, entries: Vec<TimingEntry>) -> Self {
        if let Err(e) = validate_timing(&entries) {
            debug!(error = %e, "using estimated timing instead");
            self.timing = None;
            return self;
        }
        if entries.len() != self.units.word_units.len() {
            debug!(
                entries = entries.len(),
                words = self.units.word_units.len(),
                "timing entry count differs from word count; extra entries map to the last unit"
            );
        }
        self.timing = Some(entries);
        self
    }

    pub fn mode(&self) -> Mode {
        if self.timing.is_some() {
            Mode::Exact
        } else {
            Mode::Estimated
        }
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index into `units().tokens` of the unit being spoken, if any.
    pub fn project(&self, clock: &PlaybackClock) -> Option<usize> {
        match &self.timing {
            Some(entries) => {
                let entry = project_exact(entries, clock)?;
                self.unit_for_word(entry)
            }
            None => project_estimated(&self.units.tokens, &self.weights, clock),
        }
    }

    fn unit_for_word(&self, word: usize) -> Option<usize> {
        let last = self.units.word_units.len().checked_sub(1)?;
        self.units.word_units.get(word.min(last)).copied()
    }
}
