use wasm_bindgen::prelude::*;
use serde::Serialize;

use readalong::playback::{PlaybackEvent, PlaybackState, ReadingSession, SourceId};
use readalong::{HighlightConfig, HighlightError, PlaybackClock, Rendered, SourceKind, TimingEntry};

#[derive(Serialize, Debug)]
struct BindingError {
    kind: &'static str,
    message: String,
}

impl From<HighlightError> for BindingError {
    fn from(e: HighlightError) -> Self {
        let kind = match &e {
            HighlightError::SegmentationUnavailable { .. } => "segmentation",
            HighlightError::MalformedTiming(_) => "timing",
            HighlightError::RenderEnvironmentUnavailable => "environment",
            HighlightError::Markup { .. } => "markup",
            HighlightError::Playback(_) => "playback",
            HighlightError::InvalidTransition { .. } => "transition",
            HighlightError::Config(_) => "config",
        };
        BindingError {
            kind,
            message: e.to_string(),
        }
    }
}

fn js_error(e: impl Into<BindingError>) -> JsValue {
    let e = e.into();
    JsValue::from_str(&serde_json::to_string(&e).unwrap_or(e.message))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// `-1` stands for "no highlight" on the JS side.
fn to_js_index(index: Option<usize>) -> i32 {
    index.map_or(-1, |i| i32::try_from(i).unwrap_or(i32::MAX))
}

fn from_js_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

fn parse_timing(json: &str) -> Result<Vec<TimingEntry>, BindingError> {
    serde_json::from_str(json).map_err(|e| BindingError {
        kind: "timing",
        message: e.to_string(),
    })
}

fn parse_config(yaml: Option<&str>) -> Result<HighlightConfig, BindingError> {
    match yaml {
        Some(yaml) => Ok(HighlightConfig::from_yaml(yaml)?),
        None => Ok(HighlightConfig::default()),
    }
}

fn clock(current_time: f64, duration: f64, is_playing: bool, is_paused: bool) -> PlaybackClock {
    PlaybackClock {
        current_time,
        duration,
        is_playing,
        is_paused,
    }
}

/// Segment text and return the tokens as a JSON array
#[wasm_bindgen]
pub fn segment(text: &str, locale: Option<String>) -> String {
    to_json(&readalong::segment(text, locale.as_deref()))
}

/// Active token index for plain text under estimated timing, or -1
#[wasm_bindgen]
pub fn project_estimated(text: &str, current_time: f64, duration: f64, is_playing: bool, is_paused: bool) -> i32 {
    let tokens = readalong::segment(text, None);
    let weights: Vec<f64> = tokens.iter().map(|t| t.weight).collect();
    to_js_index(readalong::project_estimated(
        &tokens,
        &weights,
        &clock(current_time, duration, is_playing, is_paused),
    ))
}

/// Active timing entry for a JSON timing array, or -1
#[wasm_bindgen]
pub fn project_exact(
    timing_json: &str,
    current_time: f64,
    duration: f64,
    is_playing: bool,
    is_paused: bool,
) -> Result<i32, JsValue> {
    let entries = parse_timing(timing_json).map_err(js_error)?;
    Ok(to_js_index(readalong::project_exact(
        &entries,
        &clock(current_time, duration, is_playing, is_paused),
    )))
}

/// Mark word `active_index` in an HTML fragment; -1 returns it unchanged
#[wasm_bindgen]
pub fn annotate_html(markup: &str, active_index: i32) -> String {
    readalong::annotate(markup, from_js_index(active_index))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TickResult {
    active_index: i32,
    changed: bool,
    rendered: Rendered,
}

/// One text block driven by an audio element's events
#[wasm_bindgen]
pub struct WasmHighlighter {
    session: ReadingSession,
    source: Option<SourceId>,
}

impl WasmHighlighter {
    fn build(source: &str, is_html: bool, config_yaml: Option<&str>) -> Result<Self, BindingError> {
        let config = parse_config(config_yaml)?;
        let mut session = ReadingSession::new(config);
        let kind = if is_html { SourceKind::Html } else { SourceKind::Plain };
        session.add_block(source, kind);
        Ok(Self { session, source: None })
    }

    fn event(&mut self, event: PlaybackEvent) -> Result<(), BindingError> {
        match self.source {
            Some(source) => Ok(self.session.handle(source, event)?),
            None => Err(BindingError {
                kind: "transition",
                message: format!("Cannot {} before play", event.name()),
            }),
        }
    }

    fn tick_result(&mut self) -> TickResult {
        let highlight = self.session.tick_all().into_iter().next();
        match highlight {
            Some(h) => TickResult {
                active_index: to_js_index(h.active_index),
                changed: h.changed,
                rendered: h.rendered,
            },
            None => TickResult {
                active_index: -1,
                changed: false,
                rendered: Rendered::Markup(String::new()),
            },
        }
    }

    fn snapshot(&self) -> PlaybackState {
        self.session.state().clone()
    }
}

#[wasm_bindgen]
impl WasmHighlighter {
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str, is_html: bool, config_yaml: Option<String>) -> Result<WasmHighlighter, JsValue> {
        Self::build(source, is_html, config_yaml.as_deref()).map_err(js_error)
    }

    /// Provider word timing as a JSON array of `{text, start, end}`
    pub fn set_timing(&mut self, timing_json: &str) -> Result<(), JsValue> {
        let entries = parse_timing(timing_json).map_err(js_error)?;
        self.session.set_block_timing(0, entries);
        Ok(())
    }

    /// Start a new read; any previous one is stopped first
    pub fn play(&mut self) -> Result<(), JsValue> {
        let id = self.session.start_read().map_err(js_error)?;
        self.source = Some(id);
        Ok(())
    }

    /// Audio element fired `playing`
    pub fn started(&mut self, duration: f64) -> Result<(), JsValue> {
        self.event(PlaybackEvent::Started { duration }).map_err(js_error)
    }

    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.event(PlaybackEvent::Pause).map_err(js_error)
    }

    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.event(PlaybackEvent::Resume).map_err(js_error)
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.source = None;
    }

    /// Audio element fired `ended`
    pub fn ended(&mut self) -> Result<(), JsValue> {
        self.event(PlaybackEvent::Ended).map_err(js_error)
    }

    /// Audio element fired `error`
    pub fn failed(&mut self, message: String) -> Result<(), JsValue> {
        self.event(PlaybackEvent::Failed { message }).map_err(js_error)
    }

    /// Audio element fired `timeupdate`
    pub fn time_update(&mut self, current_time: f64, duration: f64) {
        if let Some(source) = self.source {
            self.session.time_update(source, current_time, duration);
        }
    }

    /// Highlight at the current clock as JSON: `{activeIndex, changed, rendered}`
    pub fn tick(&mut self) -> String {
        to_json(&self.tick_result())
    }

    /// Clear the last highlight without touching playback
    pub fn reset(&mut self) {
        self.session.reset_blocks();
    }

    /// Playback state as JSON
    pub fn state(&self) -> String {
        to_json(&self.snapshot())
    }

    /// User-displayable error, if playback failed
    pub fn error(&self) -> Option<String> {
        self.session.error().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_conversion() {
        assert_eq!(to_js_index(None), -1);
        assert_eq!(to_js_index(Some(4)), 4);
        assert_eq!(from_js_index(-1), None);
        assert_eq!(from_js_index(2), Some(2));
    }

    #[test]
    fn test_free_functions() {
        let tokens: serde_json::Value = serde_json::from_str(&segment("Hi there", None)).unwrap();
        assert_eq!(tokens[2]["text"], "there");
        assert_eq!(tokens[1]["isWhitespace"], true);

        assert_eq!(project_estimated("Hi there", 0.0, 0.0, true, false), -1);
        assert_eq!(project_estimated("Hi there", 0.9, 1.0, true, false), 2);
        assert_eq!(project_estimated("Hi there", 0.9, 1.0, false, false), -1);

        assert_eq!(annotate_html("<p>a b</p>", -1), "<p>a b</p>");
        assert!(annotate_html("<p>a b</p>", 2).contains(">b</span>"));
    }

    #[test]
    fn test_parse_errors_carry_kind() {
        assert_eq!(parse_timing("not json").err().map(|e| e.kind), Some("timing"));
        assert_eq!(parse_config(Some("granularity: x")).err().map(|e| e.kind), Some("config"));
    }

    #[test]
    fn test_highlighter_lifecycle() {
        let mut highlighter = WasmHighlighter::build("one two", false, None).unwrap();
        assert!(highlighter.event(PlaybackEvent::Pause).is_err());

        let id = highlighter.session.start_read().unwrap();
        highlighter.source = Some(id);
        highlighter.event(PlaybackEvent::Started { duration: 1.0 }).unwrap();
        highlighter.time_update(0.9, 1.0);

        let result = highlighter.tick_result();
        assert_eq!(result.active_index, 2);
        assert!(result.changed);

        let state: serde_json::Value = serde_json::from_str(&highlighter.state()).unwrap();
        assert_eq!(state["status"], "playing");
        assert_eq!(state["isPlaying"], true);
        assert_eq!(state["isLoading"], false);

        highlighter.stop();
        assert_eq!(highlighter.tick_result().active_index, -1);
    }
}
