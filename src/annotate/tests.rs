use super::*;

const MARK_OPEN: &str = "<span class=\"readalong-active\" data-readalong-active=\"true\" \
    style=\"background-color: rgba(253, 224, 71, 0.45); padding: 0 0.15em; border-radius: 0.25em;\">";

fn marked(word: &str) -> String {
    format!("{}{}</span>", MARK_OPEN, word)
}

#[test]
fn test_word_marks_exactly_one_word() {
    let markup = r#"<p class="intro">The <b>quick</b> fox.</p>"#;
    let annotator = Annotator::new(Granularity::Word);
    let out = annotator.annotate_html(markup, Some(2));
    assert_eq!(
        out,
        format!(r#"<p class="intro">The <b>{}</b> fox.</p>"#, marked("quick"))
    );
    assert_eq!(out.matches("data-readalong-active").count(), 1);
}

#[test]
fn test_word_indices_match_units() {
    let markup = "<h1>Title</h1>\n<p>Hello, <i>dear</i> reader!</p>";
    let annotator = Annotator::new(Granularity::Word);
    let units = annotator.html_units(markup);
    let words: Vec<&str> = units
        .tokens
        .iter()
        .filter(|t| !t.is_whitespace)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(words, vec!["Title", "Hello,", "dear", "reader!"]);

    for &index in &units.word_units {
        let out = annotator.annotate_html(markup, Some(index));
        assert!(out.contains(&marked(&units.tokens[index].text)), "word {}", index);
    }
}

#[test]
fn test_annotation_is_idempotent_and_not_cumulative() {
    let markup = "<ul><li>one two</li><li>three</li></ul>";
    let annotator = Annotator::new(Granularity::Word);
    let first = annotator.annotate_html(markup, Some(0));
    let second = annotator.annotate_html(markup, Some(0));
    assert_eq!(first, second);

    let moved = annotator.annotate_html(markup, Some(2));
    assert_eq!(moved.matches("data-readalong-active").count(), 1);
    assert!(moved.contains(&marked("two")));
    assert!(!moved.contains(&marked("one")));

    assert_eq!(annotator.annotate_html(markup, None), markup);
}

#[test]
fn test_whitespace_or_out_of_range_index_leaves_markup_unchanged() {
    let markup = "<p>one two</p>";
    let annotator = Annotator::new(Granularity::Word);
    assert_eq!(annotator.annotate_html(markup, Some(1)), markup);
    assert_eq!(annotator.annotate_html(markup, Some(40)), markup);
}

#[test]
fn test_empty_markup() {
    let annotator = Annotator::default();
    assert_eq!(annotator.annotate_html("", Some(0)), "");
    assert!(annotator.html_units("").tokens.is_empty());
}

#[test]
fn test_attributes_comments_and_void_elements_preserved() {
    let markup = "<!DOCTYPE html><div data-x='a &amp; b'><!-- note --><p>Line<br>next <img src=\"a.png\" alt=\"x\"/> end</p></div>";
    let annotator = Annotator::new(Granularity::Word);
    // "Line" is 0, "next" is 1
    let out = annotator.annotate_html(markup, Some(1));
    assert_eq!(
        out,
        format!(
            "<!DOCTYPE html><div data-x='a &amp; b'><!-- note --><p>Line<br>{} <img src=\"a.png\" alt=\"x\"/> end</p></div>",
            marked("next")
        )
    );
}

#[test]
fn test_entities_stay_escaped() {
    let markup = "<p>Tom &amp; Jerry</p>";
    let annotator = Annotator::new(Granularity::Word);
    let out = annotator.annotate_html(markup, Some(2));
    assert_eq!(out, format!("<p>Tom {} Jerry</p>", marked("&amp;")));

    let units = annotator.html_units(markup);
    assert_eq!(units.tokens[2].text, "&");
    assert_eq!(units.tokens[2].weight, 1.0);
    assert_eq!(&markup[units.tokens[2].start_offset..units.tokens[2].end_offset()], "&amp;");
}

#[test]
fn test_nbsp_separates_words() {
    let markup = "<p>Fish&nbsp; &nbsp;chips</p>";
    let annotator = Annotator::new(Granularity::Word);
    let units = annotator.html_units(markup);
    let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Fish", "\u{a0} \u{a0}", "chips"]);
    let weights: Vec<f64> = units.tokens.iter().map(|t| t.weight).collect();
    assert_eq!(weights, vec![4.0, 0.0, 5.0]);

    let sources: Vec<&str> = units
        .tokens
        .iter()
        .map(|t| &markup[t.start_offset..t.end_offset()])
        .collect();
    assert_eq!(sources, vec!["Fish", "&nbsp; &nbsp;", "chips"]);

    assert_eq!(annotator.annotate_html(markup, Some(1)), markup);
    assert_eq!(
        annotator.annotate_html(markup, Some(0)),
        format!("<p>{}&nbsp; &nbsp;chips</p>", marked("Fish"))
    );
    assert_eq!(
        annotator.annotate_html(markup, Some(2)),
        format!("<p>Fish&nbsp; &nbsp;{}</p>", marked("chips"))
    );

    let spaced = "<p>a &nbsp; b</p>";
    let units = annotator.html_units(spaced);
    assert_eq!(units.tokens.len(), 3);
    assert!(units.tokens[1].is_whitespace);
    assert_eq!(annotator.annotate_html(spaced, Some(2)), format!("<p>a &nbsp; {}</p>", marked("b")));
}

#[test]
fn test_unknown_entity_is_spoken_literally() {
    let markup = "<p>x &bogus; y</p>";
    let annotator = Annotator::new(Granularity::Word);
    let units = annotator.html_units(markup);
    assert_eq!(units.tokens[2].text, "&bogus;");
    assert_eq!(annotator.annotate_html(markup, Some(2)), format!("<p>x {} y</p>", marked("&bogus;")));
}

#[test]
fn test_script_and_style_are_not_spoken() {
    let markup = "<style>p { color: red; }</style><p>Read me</p><script>var x = 1;</script>";
    let annotator = Annotator::new(Granularity::Word);
    let units = annotator.html_units(markup);
    let words: Vec<&str> = units
        .tokens
        .iter()
        .filter(|t| !t.is_whitespace)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(words, vec!["Read", "me"]);
    let out = annotator.annotate_html(markup, Some(0));
    assert!(out.starts_with("<style>p { color: red; }</style><p>"));
    assert!(out.contains(&marked("Read")));
}

#[test]
fn test_unparseable_markup_is_returned_unchanged() {
    let markup = "<p>broken <a href=\"x</p>";
    let annotator = Annotator::new(Granularity::Word);
    assert_eq!(annotator.annotate_html(markup, Some(0)), markup);
}

#[test]
fn test_headless_is_noop() {
    let annotator = Annotator::new(Granularity::Word).with_environment(RenderEnvironment::Headless);
    assert_eq!(annotator.annotate_html("<p>hi</p>", Some(0)), "<p>hi</p>");
    assert!(annotator.annotate_plain("hi there", Some(0)).iter().all(|t| !t.active));
}

#[test]
fn test_block_units_follow_innermost_block() {
    let markup = "<h2>Lesson one</h2><p>Plants need <em>light</em> and water.</p><ul><li>Sun</li><li>Rain</li></ul>";
    let annotator = Annotator::new(Granularity::Block);
    let units = annotator.html_units(markup);
    let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Lesson one", "Plants need light and water.", "Sun", "Rain"]
    );
    let weights: Vec<f64> = units.tokens.iter().map(|t| t.weight).collect();
    assert_eq!(weights, vec![2.0, 5.0, 1.0, 1.0]);
    assert_eq!(units.word_units, vec![0, 0, 1, 1, 1, 1, 1, 2, 3]);
}

#[test]
fn test_block_marks_every_text_run_of_active_block() {
    let markup = "<h2>Lesson one</h2><p>Plants need <em>light</em> and water.</p>";
    let annotator = Annotator::new(Granularity::Block);
    let out = annotator.annotate_html(markup, Some(1));
    assert_eq!(
        out,
        format!(
            "<h2>Lesson one</h2><p>{} <em>{}</em> {}</p>",
            marked("Plants need"),
            marked("light"),
            marked("and water.")
        )
    );
    assert_eq!(annotator.annotate_html(markup, Some(0)).matches("data-readalong-active").count(), 1);
    assert_eq!(annotator.annotate_html(markup, Some(7)), markup);
}

#[test]
fn test_block_nested_list_paragraph() {
    let markup = "<li>Intro <p>Inner para</p> outro</li>";
    let annotator = Annotator::new(Granularity::Block);
    let units = annotator.html_units(markup);
    let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Intro  outro", "Inner para"]);

    let outer = &units.tokens[0];
    assert_eq!(outer.start_offset, 4);
    assert_eq!(
        &markup[outer.start_offset..outer.end_offset()],
        "Intro <p>Inner para</p> outro"
    );
    let inner = &units.tokens[1];
    assert_eq!(&markup[inner.start_offset..inner.end_offset()], "Inner para");

    let out = annotator.annotate_html(markup, Some(0));
    assert_eq!(
        out,
        format!("<li>{} <p>Inner para</p> {}</li>", marked("Intro"), marked("outro"))
    );
}

#[test]
fn test_block_loose_text_forms_anonymous_blocks() {
    let markup = "<div>Before<p>Inside</p>After</div>";
    let annotator = Annotator::new(Granularity::Block);
    let units = annotator.html_units(markup);
    let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Before", "Inside", "After"]);
}

#[test]
fn test_plain_annotation() {
    let annotator = Annotator::new(Granularity::Word);
    let tokens = annotator.annotate_plain("Hello world!", Some(2));
    let active: Vec<&str> = tokens.iter().filter(|t| t.active).map(|t| t.text.as_str()).collect();
    assert_eq!(active, vec!["world!"]);
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(joined, "Hello world!");
}

#[test]
fn test_plain_block_annotation() {
    let annotator = Annotator::new(Granularity::Block);
    let tokens = annotator.annotate_plain("Line one\nLine two", Some(2));
    assert_eq!(tokens.len(), 3);
    assert!(tokens[2].active);
    assert_eq!(tokens[2].text, "Line two");
}

#[test]
fn test_free_annotate_function() {
    assert_eq!(annotate("<p>a b</p>", Some(2)), format!("<p>a {}</p>", marked("b")));
    assert_eq!(annotate("<p>a b</p>", None), "<p>a b</p>");
}
