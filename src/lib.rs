pub mod annotate;
pub mod cache;
pub mod config;
pub mod error;
pub mod highlighter;
pub mod playback;
pub mod segment;
pub mod timing;
pub mod weight;

pub use annotate::{annotate, AnnotatedToken, Annotator, HighlightStyle, RenderEnvironment};
pub use config::HighlightConfig;
pub use error::*;
pub use highlighter::{Highlight, Highlighter, Rendered, SourceKind};
pub use segment::{segment, Locale, Token};
pub use timing::{
    project_estimated, project_exact, Granularity, Mode, PlaybackClock, Timeline, TimingEntry, Units,
};
pub use weight::{sentence_weight, weight, Estimator, WeightConfig};

/// Highlight one word of an HTML fragment at a point in playback.
/// This is the main entry point for one-off rendering.
///
/// Uses estimated timing, or `timing` when it is usable.
///
/// # Example
/// ```rust
/// use readalong::{highlight_html, PlaybackClock};
///
/// let clock = PlaybackClock::playing(1.9, 2.0);
/// let out = highlight_html("<p>Hello world</p>", &clock, None);
/// assert!(out.ends_with(">world</span></p>"));
/// ```
pub fn highlight_html(markup: &str, clock: &PlaybackClock, timing: Option<Vec<TimingEntry>>) -> String {
    let config = HighlightConfig::default();
    let mut highlighter = Highlighter::new(markup, SourceKind::Html, &config);
    if let Some(entries) = timing {
        highlighter.set_timing(entries);
    }
    match highlighter.tick(clock).rendered {
        Rendered::Markup(out) => out,
        Rendered::Tokens(_) => markup.to_string(),
    }
}
