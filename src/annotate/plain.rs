//! Plain-text annotation
//!
//! Plain text needs no parsing: the units are the segmenter's tokens (or
//! lines of them), and the output is the same token array with one element
//! flagged, for the caller to render as styled spans.

use serde::Serialize;

use crate::segment::{segment, Token};
use crate::timing::{Granularity, Units};

/// One renderable piece of plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedToken {
    pub text: String,
    pub is_whitespace: bool,
    pub active: bool,
}

/// Addressable units of plain text.
///
/// Words for [`Granularity::Word`]; for [`Granularity::Block`], each line of
/// text is one unit and the line breaks between them are whitespace units.
pub fn plain_units(text: &str, granularity: Granularity, locale: Option<&str>) -> Units {
    units_from_tokens(segment(text, locale), granularity)
}

/// Build units from already-segmented tokens.
pub fn units_from_tokens(tokens: Vec<Token>, granularity: Granularity) -> Units {
    match granularity {
        Granularity::Word => Units::from_words(tokens),
        Granularity::Block => line_units(tokens),
    }
}

/// Flag unit `active` in the unit sequence.
pub fn render_tokens(units: &Units, active: Option<usize>) -> Vec<AnnotatedToken> {
    units
        .tokens
        .iter()
        .enumerate()
        .map(|(i, t)| AnnotatedToken {
            text: t.text.clone(),
            is_whitespace: t.is_whitespace,
            active: !t.is_whitespace && active == Some(i),
        })
        .collect()
}

fn is_line_break(token: &Token) -> bool {
    token.is_whitespace && token.text.contains('\n')
}

fn line_units(tokens: Vec<Token>) -> Units {
    let mut lines: Vec<Token> = Vec::new();
    let mut word_units = Vec::new();

    for token in tokens {
        let spoken = !token.is_whitespace;
        match lines.last_mut() {
            Some(line) if !is_line_break(&token) && !is_line_break(line) => {
                line.text.push_str(&token.text);
                line.source_len += token.source_len;
                line.is_whitespace &= token.is_whitespace;
            }
            _ => lines.push(token),
        }
        if spoken {
            word_units.push(lines.len() - 1);
        }
    }

    for (i, line) in lines.iter_mut().enumerate() {
        line.weight = if line.is_whitespace {
            0.0
        } else {
            word_units.iter().filter(|u| **u == i).count().max(1) as f64
        };
    }

    Units {
        tokens: lines,
        word_units,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_units() {
        let units = plain_units("First line here.\n\nSecond one\n", Granularity::Block, None);
        let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["First line here.", "\n\n", "Second one", "\n"]);
        assert_eq!(units.word_units, vec![0, 0, 0, 2, 2]);
        assert_eq!(units.tokens[0].weight, 3.0);
        assert_eq!(units.tokens[1].weight, 0.0);
        assert_eq!(units.tokens[2].weight, 2.0);
        assert_eq!(units.tokens[2].start_offset, 18);
        assert_eq!(units.tokens[2].end_offset(), 28);
    }

    #[test]
    fn test_line_units_leading_indent() {
        let units = plain_units("  indented\nnext", Granularity::Block, None);
        let texts: Vec<&str> = units.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["  indented", "\n", "next"]);
        assert!(!units.tokens[0].is_whitespace);
    }

    #[test]
    fn test_render_flags_one_token() {
        let units = plain_units("Hello world!", Granularity::Word, None);
        let rendered = render_tokens(&units, Some(2));
        assert_eq!(rendered.len(), 3);
        assert!(!rendered[0].active);
        assert!(rendered[1].is_whitespace);
        assert!(rendered[2].active);
        assert_eq!(rendered[2].text, "world!");
    }

    #[test]
    fn test_render_whitespace_never_active() {
        let units = plain_units("a b", Granularity::Word, None);
        assert!(render_tokens(&units, Some(1)).iter().all(|t| !t.active));
        assert!(render_tokens(&units, None).iter().all(|t| !t.active));
        assert!(render_tokens(&units, Some(99)).iter().all(|t| !t.active));
    }
}
