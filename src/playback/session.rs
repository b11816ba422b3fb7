//! Reading sessions
//!
//! A session is one place on screen where read-aloud can happen: one
//! adapter, one clock, and the highlighters for every block it covers. Only
//! one audio source is live per session. Starting a new read stops the old
//! one first, and events still arriving from the old source are dropped.

use serde::Serialize;
use tracing::debug;

use crate::cache::TokenCache;
use crate::config::HighlightConfig;
use crate::error::HighlightError;
use crate::highlighter::{Highlight, Highlighter, SourceKind};
use crate::timing::TimingEntry;

use super::state::{PlaybackAdapter, PlaybackEvent, PlaybackState, PlaybackStatus};

/// Identifies one read-aloud request within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(u64);

impl SourceId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ReadingSession {
    adapter: PlaybackAdapter,
    config: HighlightConfig,
    cache: TokenCache,
    blocks: Vec<Highlighter>,
    current: Option<SourceId>,
    next_id: u64,
}

impl ReadingSession {
    pub fn new(config: HighlightConfig) -> Self {
        let cache = TokenCache::with_capacity(config.cache_capacity);
        Self {
            adapter: PlaybackAdapter::new(),
            config,
            cache,
            blocks: Vec::new(),
            current: None,
            next_id: 0,
        }
    }

    /// Add a text block; returns its index.
    pub fn add_block(&mut self, source: impl Into<String>, kind: SourceKind) -> usize {
        let highlighter = Highlighter::cached(source, kind, &self.config, &mut self.cache);
        self.blocks.push(highlighter);
        self.blocks.len() - 1
    }

    /// Add a text block with provider word timing; returns its index.
    pub fn add_block_with_timing(
        &mut self,
        source: impl Into<String>,
        kind: SourceKind,
        timing: Vec<TimingEntry>,
    ) -> usize {
        let highlighter =
            Highlighter::cached(source, kind, &self.config, &mut self.cache).with_timing(timing);
        self.blocks.push(highlighter);
        self.blocks.len() - 1
    }

    /// Replace the text of block `index`. Returns `false` if there is no
    /// such block.
    pub fn set_block_source(&mut self, index: usize, source: impl Into<String>, kind: SourceKind) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                *block = Highlighter::cached(source, kind, &self.config, &mut self.cache);
                true
            }
            None => false,
        }
    }

    /// Attach provider word timing to block `index`. Returns `false` if
    /// there is no such block.
    pub fn set_block_timing(&mut self, index: usize, timing: Vec<TimingEntry>) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                block.set_timing(timing);
                true
            }
            None => false,
        }
    }

    pub fn blocks(&self) -> &[Highlighter] {
        &self.blocks
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn state(&self) -> &PlaybackState {
        self.adapter.state()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.adapter.status()
    }

    /// User-displayable error message, if the last source failed.
    pub fn error(&self) -> Option<&str> {
        self.adapter.state().error.as_deref()
    }

    pub fn current(&self) -> Option<SourceId> {
        self.current
    }

    /// Begin a new read-aloud request, tearing down any previous one.
    pub fn start_read(&mut self) -> Result<SourceId, HighlightError> {
        if let Some(previous) = self.current.take() {
            debug!(source = previous.0, "tearing down previous source");
        }
        self.stop();
        self.adapter.apply(PlaybackEvent::Request)?;

        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.current = Some(id);
        Ok(id)
    }

    /// Apply an event from `source`. Events from a torn-down source are
    /// ignored.
    pub fn handle(&mut self, source: SourceId, event: PlaybackEvent) -> Result<(), HighlightError> {
        if self.current != Some(source) {
            debug!(source = source.0, event = event.name(), "ignoring event from stale source");
            return Ok(());
        }

        self.adapter.apply(event)?;
        match self.adapter.status() {
            PlaybackStatus::Idle => {
                self.current = None;
                self.reset_blocks();
            }
            // The source stays current so its error remains visible
            PlaybackStatus::Error => self.reset_blocks(),
            _ => {}
        }
        Ok(())
    }

    /// Apply a `timeupdate` from `source`.
    pub fn time_update(&mut self, source: SourceId, current_time: f64, duration: f64) {
        if self.current != Some(source) {
            debug!(source = source.0, "ignoring time update from stale source");
            return;
        }
        self.adapter.time_update(current_time, duration);
    }

    /// Stop whatever is playing and clear every highlight.
    pub fn stop(&mut self) {
        if self.adapter.status() != PlaybackStatus::Idle {
            self.adapter.reset();
        }
        self.current = None;
        self.reset_blocks();
    }

    /// Highlights for every block at the current clock.
    pub fn tick_all(&mut self) -> Vec<Highlight> {
        let clock = self.adapter.state().clock();
        self.blocks.iter_mut().map(|block| block.tick(&clock)).collect()
    }

    /// Clear every highlight without touching playback.
    pub fn reset_blocks(&mut self) {
        self.blocks.iter_mut().for_each(Highlighter::reset);
    }
}
