//! Integration tests for the readalong engine
//!
//! Drives the public API end to end: segmentation, projection, annotation and
//! the playback lifecycle.

use readalong::playback::{PlaybackEvent, ReadingSession};
use readalong::{
    annotate, highlight_html, project_estimated, project_exact, segment, sentence_weight, weight,
    HighlightConfig, Highlighter, PlaybackClock, Rendered, SourceKind, TimingEntry, WeightConfig,
};

fn spoken(text: &str) -> (Vec<readalong::Token>, Vec<f64>) {
    let tokens = segment(text, None);
    let config = WeightConfig::default();
    let weights = tokens
        .iter()
        .map(|t| if t.is_whitespace { 0.0 } else { sentence_weight(&t.text, &config) })
        .collect();
    (tokens, weights)
}

#[test]
fn test_scenario_a_end_of_audio_lands_on_last_word() {
    let (tokens, weights) = spoken("Hello world!");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", " ", "world!"]);
    assert_eq!(weights[0], 5.0);
    assert!(weights[2] > weights[0], "sentence pause should weigh 'world!' heavier");

    let at_end = PlaybackClock::playing(3.0, 3.0);
    assert_eq!(project_estimated(&tokens, &weights, &at_end), Some(2));
}

#[test]
fn test_scenario_b_exact_timing_holds_last_entry() {
    let timing = vec![TimingEntry::new("Hi", 0.0, 0.5), TimingEntry::new("there", 0.5, 1.2)];
    assert_eq!(project_exact(&timing, &PlaybackClock::playing(0.8, 1.2)), Some(1));
    assert_eq!(project_exact(&timing, &PlaybackClock::playing(5.0, 1.2)), Some(1));

    let highlighter = Highlighter::new("Hi there", SourceKind::Plain, &HighlightConfig::default())
        .with_timing(timing);
    assert_eq!(highlighter.active_index(&PlaybackClock::playing(0.8, 1.2)), Some(2));
    assert_eq!(highlighter.active_index(&PlaybackClock::playing(5.0, 1.2)), Some(2));
}

#[test]
fn test_scenario_c_stop_clears_highlight() {
    let markup = "<p>The quick brown fox</p>";
    let mut highlighter = Highlighter::new(markup, SourceKind::Html, &HighlightConfig::default());

    let playing = highlighter.tick(&PlaybackClock::playing(1.7, 2.0));
    assert!(playing.active_index.is_some());

    let stopped = PlaybackClock {
        current_time: 1.7,
        duration: 2.0,
        is_playing: false,
        is_paused: false,
    };
    let after = highlighter.tick(&stopped);
    assert_eq!(after.active_index, None);
    assert_eq!(after.rendered, Rendered::Markup(markup.to_string()));
}

#[test]
fn test_boundary_projection() {
    let (tokens, weights) = spoken("One two three.");
    assert_eq!(project_estimated(&tokens, &weights, &PlaybackClock::stopped(4.0)), None);
    assert_eq!(
        project_estimated(&tokens, &weights, &PlaybackClock::playing(4.0, 4.0)),
        Some(4)
    );
}

#[test]
fn test_weight_floor() {
    assert_eq!(weight(""), 1.0);
    assert_eq!(weight("!!!"), 1.0);
    assert_eq!(weight("..."), 1.0);
}

#[test]
fn test_annotation_idempotence() {
    let markup = "<article><h1>Title</h1><p>Some <strong>bold</strong> text &amp; more.</p></article>";
    for i in 0..12 {
        let once = annotate(markup, Some(i));
        assert_eq!(once, annotate(markup, Some(i)));
        assert!(once.matches("data-readalong-active").count() <= 1);
    }
    let _ = annotate(markup, Some(4));
    assert_eq!(annotate(markup, None), markup);
}

#[test]
fn test_segmentation_reconstruction() {
    let inputs = [
        "",
        "   ",
        "\n\t \n",
        "Hello, world!  How are you?",
        "Mixed 中文 and English, ไทย too.",
        "日本語の文章です。",
        "naïve café résumé",
        "  leading and trailing  ",
    ];
    for input in inputs {
        let joined: String = segment(input, None).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, input);
        let joined: String = segment(input, Some("ja")).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, input);
    }
}

#[test]
fn test_estimated_monotonicity() {
    let (tokens, weights) = spoken("It was the best of times, it was the worst of times. Indeed!");
    let duration = 7.3;
    let mut previous = 0;
    for step in 0..=730 {
        let t = step as f64 / 100.0;
        let index = project_estimated(&tokens, &weights, &PlaybackClock::playing(t, duration))
            .expect("engaged clock with positive duration");
        assert!(index >= previous, "regressed at t={}", t);
        assert!(!tokens[index].is_whitespace);
        previous = index;
    }
}

#[test]
fn test_one_off_html_highlight() {
    let out = highlight_html(
        "<p>Hi there</p>",
        &PlaybackClock::playing(0.8, 1.2),
        Some(vec![TimingEntry::new("Hi", 0.0, 0.5), TimingEntry::new("there", 0.5, 1.2)]),
    );
    assert!(out.ends_with(">there</span></p>"));
}

#[test]
fn test_read_aloud_session_end_to_end() {
    let config = HighlightConfig::from_yaml("granularity: block").unwrap();
    let mut session = ReadingSession::new(config);
    session.add_block(
        "<h2>Photosynthesis</h2><p>Plants turn light into sugar.</p>",
        SourceKind::Html,
    );

    let first = session.start_read().unwrap();
    session.handle(first, PlaybackEvent::Started { duration: 6.0 }).unwrap();
    session.time_update(first, 5.0, 6.0);
    let highlight = &session.tick_all()[0];
    assert_eq!(highlight.active_index, Some(1));
    let Rendered::Markup(markup) = &highlight.rendered else {
        panic!("expected markup");
    };
    assert!(markup.contains(">Plants turn light into sugar.</span></p>"));

    // A second read tears the first one down
    let second = session.start_read().unwrap();
    session.handle(first, PlaybackEvent::Pause).unwrap();
    assert_eq!(session.tick_all()[0].active_index, None);

    session.handle(second, PlaybackEvent::Started { duration: 6.0 }).unwrap();
    session.handle(second, PlaybackEvent::Ended).unwrap();
    assert_eq!(session.tick_all()[0].active_index, None);
}
