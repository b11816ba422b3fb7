//! # Highlighter
//!
//! One text block bound to a timeline and an annotator.
//!
//! ## Purpose
//! The host calls [`Highlighter::tick`] on every clock update. The
//! highlighter projects the clock onto its units and re-renders only when the
//! active unit moved; otherwise the previous output is handed back.
//!
//! The last active index is the only state kept between ticks, and
//! [`Highlighter::reset`] clears it so a fresh play never shows a stale
//! highlight before its first tick.
//!
//! ## Related Modules
//! - `timing` - projection
//! - `annotate` - rendering
//! - `playback` - resets highlighters on stop and end

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotate::{units_from_tokens, AnnotatedToken, Annotator};
use crate::cache::TokenCache;
use crate::config::HighlightConfig;
use crate::timing::{Granularity, Mode, PlaybackClock, Timeline, TimingEntry, Units};

/// How the source text should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain text, rendered as a token array
    #[default]
    Plain,
    /// An HTML fragment, rendered as markup
    Html,
}

/// Output of one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Rendered {
    Markup(String),
    Tokens(Vec<AnnotatedToken>),
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub active_index: Option<usize>,
    pub rendered: Rendered,
    /// `false` when the output is the cached render of the previous tick
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    source: String,
    kind: SourceKind,
    config: HighlightConfig,
    annotator: Annotator,
    timeline: Timeline,
    last_active: Option<usize>,
    last_output: Option<Rendered>,
}

impl Highlighter {
    /// Segment `source` and build an estimated-mode timeline for it.
    ///
    /// # Example
    /// ```rust
    /// use readalong::{HighlightConfig, Highlighter, PlaybackClock, Rendered, SourceKind};
    ///
    /// let config = HighlightConfig::default();
    /// let mut highlighter = Highlighter::new("<p>Hello world</p>", SourceKind::Html, &config);
    ///
    /// let first = highlighter.tick(&PlaybackClock::playing(0.1, 2.0));
    /// assert_eq!(first.active_index, Some(0));
    /// assert!(first.changed);
    ///
    /// let again = highlighter.tick(&PlaybackClock::playing(0.2, 2.0));
    /// assert!(!again.changed);
    ///
    /// let stopped = highlighter.tick(&PlaybackClock::stopped(2.0));
    /// assert_eq!(stopped.active_index, None);
    /// assert_eq!(stopped.rendered, Rendered::Markup("<p>Hello world</p>".to_string()));
    /// ```
    pub fn new(source: impl Into<String>, kind: SourceKind, config: &HighlightConfig) -> Self {
        let source = source.into();
        let annotator = config.annotator();
        let units = match kind {
            SourceKind::Plain => annotator.plain_units(&source),
            SourceKind::Html => annotator.html_units(&source),
        };
        Self::from_units(source, kind, config, annotator, units)
    }

    /// Like [`Highlighter::new`], taking plain-text tokens from `cache`.
    pub fn cached(
        source: impl Into<String>,
        kind: SourceKind,
        config: &HighlightConfig,
        cache: &mut TokenCache,
    ) -> Self {
        let source = source.into();
        match kind {
            SourceKind::Plain => {
                let annotator = config.annotator();
                let tokens = cache
                    .get_or_segment(&source, config.locale.as_deref())
                    .to_vec();
                let units = units_from_tokens(tokens, config.granularity);
                Self::from_units(source, kind, config, annotator, units)
            }
            SourceKind::Html => Self::new(source, kind, config),
        }
    }

    fn from_units(
        source: String,
        kind: SourceKind,
        config: &HighlightConfig,
        annotator: Annotator,
        units: Units,
    ) -> Self {
        let timeline = build_timeline(units, config);
        debug!(
            kind = ?kind,
            units = timeline.units().tokens.len(),
            words = timeline.units().word_units.len(),
            "highlighter ready"
        );
        Self {
            source,
            kind,
            config: config.clone(),
            annotator,
            timeline,
            last_active: None,
            last_output: None,
        }
    }

    /// Use provider word timing. Unusable timing keeps estimated mode.
    pub fn with_timing(mut self, entries: Vec<TimingEntry>) -> Self {
        self.set_timing(entries);
        self
    }

    pub fn set_timing(&mut self, entries: Vec<TimingEntry>) {
        let timeline = std::mem::replace(&mut self.timeline, Timeline::new(Units::default(), Vec::new()));
        self.timeline = timeline.with_timing(entries);
        self.reset();
    }

    /// Replace the text. Timing and the cached render are dropped.
    pub fn set_source(&mut self, source: impl Into<String>, kind: SourceKind) {
        let config = self.config.clone();
        *self = Self::new(source, kind, &config);
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn granularity(&self) -> Granularity {
        self.annotator.granularity
    }

    pub fn mode(&self) -> Mode {
        self.timeline.mode()
    }

    pub fn units(&self) -> &Units {
        self.timeline.units()
    }

    /// Active index for `clock`, without rendering.
    pub fn active_index(&self, clock: &PlaybackClock) -> Option<usize> {
        self.timeline.project(clock)
    }

    /// Index rendered by the previous tick.
    pub fn last_active(&self) -> Option<usize> {
        self.last_active
    }

    pub fn tick(&mut self, clock: &PlaybackClock) -> Highlight {
        let active = self.timeline.project(clock);

        if active == self.last_active {
            if let Some(rendered) = &self.last_output {
                return Highlight {
                    active_index: active,
                    rendered: rendered.clone(),
                    changed: false,
                };
            }
        }

        let rendered = self.render(active);
        self.last_active = active;
        self.last_output = Some(rendered.clone());
        Highlight {
            active_index: active,
            rendered,
            changed: true,
        }
    }

    /// Forget the last active index and the cached render.
    pub fn reset(&mut self) {
        self.last_active = None;
        self.last_output = None;
    }

    /// Render the source with unit `active` marked.
    pub fn render(&self, active: Option<usize>) -> Rendered {
        match self.kind {
            SourceKind::Plain => Rendered::Tokens(self.annotator.render_units(self.timeline.units(), active)),
            SourceKind::Html => Rendered::Markup(self.annotator.annotate_html(&self.source, active)),
        }
    }
}

fn build_timeline(units: Units, config: &HighlightConfig) -> Timeline {
    match config.granularity {
        Granularity::Word => Timeline::estimated(units, config.estimator, &config.weights),
        Granularity::Block => {
            let weights = units.tokens.iter().map(|t| t.weight).collect();
            Timeline::new(units, weights)
        }
    }
}
