//! HTML fragment walker
//!
//! The markup is tokenized once per call into a flat list of pieces: text
//! runs (which can be highlighted) and everything else (tags, comments,
//! doctypes), which is copied back byte for byte. Nothing is kept between
//! calls, so annotating never accumulates wrapper elements.
//!
//! Each text run is attributed to its innermost open block element (`p`,
//! `h1`..`h6`, `li`, ...). Text outside any block forms anonymous blocks,
//! split wherever a block element opens or closes.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::HighlightError;
use crate::segment::{segment, Token};
use crate::timing::{Granularity, Units};

use super::style::HighlightStyle;

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "dt", "dd",
    "figcaption", "td", "th",
];

// Raw-text elements: their content is never spoken
const OPAQUE_ELEMENTS: &[&str] = &["script", "style", "template", "textarea"];

// Longest named reference in the HTML5 table is `&CounterClockwiseContourIntegral;`
const MAX_REFERENCE_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Element(usize),
    Anonymous(usize),
}

/// A token of a text run: the decoded token plus the markup it came from.
#[derive(Debug)]
struct RunToken<'a> {
    raw: &'a str,
    token: Token,
}

#[derive(Debug)]
enum Piece<'a> {
    Verbatim(&'a str),
    Text {
        owner: Owner,
        tokens: Vec<RunToken<'a>>,
    },
}

/// Tokenized markup, borrowing from the source string.
#[derive(Debug)]
pub(crate) struct Document<'a> {
    pieces: Vec<Piece<'a>>,
}

impl<'a> Document<'a> {
    pub(crate) fn parse(markup: &'a str, locale: Option<&str>) -> Result<Self, HighlightError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = false;

        let mut pieces = Vec::new();
        let mut cursor = 0usize;
        let mut open_blocks: Vec<(String, usize)> = Vec::new();
        let mut opaque: Vec<String> = Vec::new();
        let mut next_block = 0usize;
        // Bumped at every block boundary so loose text on either side of a
        // block lands in different anonymous blocks
        let mut boundary = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| HighlightError::Markup {
                position: reader.buffer_position(),
                message: e.to_string(),
            })?;

            match event {
                Event::Eof => break,
                Event::Text(text) => {
                    let end = cursor + text.len();
                    let raw = slice(markup, cursor, end)?;
                    if raw.as_bytes() != &*text {
                        return Err(HighlightError::Markup {
                            position: cursor,
                            message: "text position out of sync".to_string(),
                        });
                    }
                    if opaque.is_empty() {
                        let owner = match open_blocks.last() {
                            Some((_, id)) => Owner::Element(*id),
                            None => Owner::Anonymous(boundary),
                        };
                        pieces.push(Piece::Text {
                            owner,
                            tokens: tokenize_run(raw, cursor, locale),
                        });
                    } else {
                        pieces.push(Piece::Verbatim(raw));
                    }
                    cursor = end;
                }
                Event::Start(start) => {
                    let end = reader.buffer_position();
                    pieces.push(Piece::Verbatim(tag_slice(markup, cursor, end)?));
                    cursor = end;

                    let name = element_name(start.name().as_ref());
                    if OPAQUE_ELEMENTS.contains(&name.as_str()) {
                        opaque.push(name);
                    } else if opaque.is_empty() && BLOCK_ELEMENTS.contains(&name.as_str()) {
                        open_blocks.push((name, next_block));
                        next_block += 1;
                        boundary += 1;
                    }
                }
                Event::End(end_tag) => {
                    let end = reader.buffer_position();
                    pieces.push(Piece::Verbatim(tag_slice(markup, cursor, end)?));
                    cursor = end;

                    // Unbalanced end tags are tolerated: close back to the
                    // nearest matching element, or ignore the tag
                    let name = element_name(end_tag.name().as_ref());
                    if let Some(pos) = opaque.iter().rposition(|n| *n == name) {
                        opaque.truncate(pos);
                    } else if let Some(pos) = open_blocks.iter().rposition(|(n, _)| *n == name) {
                        open_blocks.truncate(pos);
                        boundary += 1;
                    }
                }
                _ => {
                    // Empty elements, comments, CDATA, declarations, doctypes
                    let end = reader.buffer_position();
                    pieces.push(Piece::Verbatim(tag_slice(markup, cursor, end)?));
                    cursor = end;
                }
            }
        }

        if cursor < markup.len() {
            pieces.push(Piece::Verbatim(slice(markup, cursor, markup.len())?));
        }

        Ok(Self { pieces })
    }

    /// Addressable units for the given granularity.
    pub(crate) fn units(&self, granularity: Granularity) -> Units {
        match granularity {
            Granularity::Word => {
                let tokens = self.text_tokens().map(|(_, run)| run.token.clone()).collect();
                Units::from_words(tokens)
            }
            Granularity::Block => self.block_units(),
        }
    }

    /// Serialize the document with unit `active` marked.
    pub(crate) fn render(&self, active: usize, granularity: Granularity, style: &HighlightStyle) -> String {
        let target_block = match granularity {
            Granularity::Word => None,
            Granularity::Block => match self.block_order().get(active) {
                Some(owner) => Some(*owner),
                None => return self.serialize(),
            },
        };

        let mut out = String::new();
        let mut index = 0usize;

        for piece in &self.pieces {
            match piece {
                Piece::Verbatim(raw) => out.push_str(raw),
                Piece::Text { owner, tokens, .. } => match target_block {
                    Some(target) if target == *owner => push_block_text(&mut out, tokens, style),
                    Some(_) => tokens.iter().for_each(|t| out.push_str(t.raw)),
                    None => {
                        for run in tokens {
                            if index == active && !run.token.is_whitespace {
                                out.push_str(&style.wrap(run.raw));
                            } else {
                                out.push_str(run.raw);
                            }
                            index += 1;
                        }
                    }
                },
            }
        }

        out
    }

    /// Serialize without any marker.
    pub(crate) fn serialize(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Verbatim(raw) => out.push_str(raw),
                Piece::Text { tokens, .. } => tokens.iter().for_each(|t| out.push_str(t.raw)),
            }
        }
        out
    }

    /// `(owner, token)` for every text token in document order.
    fn text_tokens(&self) -> impl Iterator<Item = (Owner, &RunToken<'a>)> + '_ {
        self.pieces.iter().flat_map(|piece| match piece {
            Piece::Text { owner, tokens } => tokens.iter().map(|t| (*owner, t)).collect::<Vec<_>>(),
            Piece::Verbatim(_) => Vec::new(),
        })
    }

    /// Blocks that own spoken text, in order of first appearance.
    fn block_order(&self) -> Vec<Owner> {
        let mut order = Vec::new();
        for (owner, run) in self.text_tokens() {
            if !run.token.is_whitespace && !order.contains(&owner) {
                order.push(owner);
            }
        }
        order
    }

    /// One unit per block. A block token starts at its first spoken word
    /// and its source span ends after its last one, tags included.
    fn block_units(&self) -> Units {
        let order = self.block_order();
        // (first spoken offset, end of last spoken word, text, words)
        let mut blocks: Vec<(usize, usize, String, usize)> =
            vec![(usize::MAX, 0, String::new(), 0); order.len()];
        let mut word_units = Vec::new();

        for (owner, run) in self.text_tokens() {
            let Some(unit) = order.iter().position(|o| *o == owner) else {
                continue;
            };
            let (start, end, text, words) = &mut blocks[unit];
            text.push_str(&run.token.text);
            if !run.token.is_whitespace {
                *start = (*start).min(run.token.start_offset);
                *end = (*end).max(run.token.end_offset());
                *words += 1;
                word_units.push(unit);
            }
        }

        let tokens = blocks
            .into_iter()
            .map(|(start, end, text, words)| {
                let mut token = Token::spanning(text.trim(), start, end.saturating_sub(start));
                token.weight = words.max(1) as f64;
                token
            })
            .collect();

        Units { tokens, word_units }
    }
}

/// Wrap the non-whitespace core of one text run, leaving surrounding
/// whitespace outside the marker.
fn push_block_text(out: &mut String, tokens: &[RunToken<'_>], style: &HighlightStyle) {
    let first = tokens.iter().position(|t| !t.token.is_whitespace);
    let last = tokens.iter().rposition(|t| !t.token.is_whitespace);
    let (Some(first), Some(last)) = (first, last) else {
        tokens.iter().for_each(|t| out.push_str(t.raw));
        return;
    };

    tokens[..first].iter().for_each(|t| out.push_str(t.raw));
    let core: String = tokens[first..=last].iter().map(|t| t.raw).collect();
    out.push_str(&style.wrap(&core));
    tokens[last + 1..].iter().for_each(|t| out.push_str(t.raw));
}

/// Decode a raw text run and segment it.
///
/// Segmentation runs on the decoded text so that `&nbsp;` separates words
/// and `&amp;` weighs like `&`. Each token keeps the raw slice it was
/// decoded from; the raw slices of a run concatenate back to the run.
fn tokenize_run<'a>(raw: &'a str, offset: usize, locale: Option<&str>) -> Vec<RunToken<'a>> {
    let mut decoded = String::with_capacity(raw.len());
    // (decoded offset, raw offset) where each character or reference starts
    let mut starts: Vec<(usize, usize)> = Vec::new();
    let mut raw_pos = 0;

    while raw_pos < raw.len() {
        let rest = &raw[raw_pos..];
        starts.push((decoded.len(), raw_pos));
        match reference_at(rest) {
            Some((len, text)) => {
                decoded.push_str(&text);
                raw_pos += len;
            }
            None => {
                let Some(c) = rest.chars().next() else {
                    break;
                };
                decoded.push(c);
                raw_pos += c.len_utf8();
            }
        }
    }

    let raw_start = |decoded_pos: usize| -> usize {
        let i = starts.partition_point(|(d, _)| *d <= decoded_pos);
        starts.get(i.wrapping_sub(1)).map_or(0, |(_, r)| *r)
    };

    let tokens = segment(&decoded, locale);
    let mut runs = Vec::with_capacity(tokens.len());
    // Text of a token that ends inside a multi-character reference
    let mut carried = String::new();

    for (i, token) in tokens.iter().enumerate() {
        let start = raw_start(token.start_offset);
        let end = tokens
            .get(i + 1)
            .map_or(raw.len(), |next| raw_start(next.start_offset));
        if end <= start {
            carried.push_str(&token.text);
            continue;
        }

        let text = if carried.is_empty() {
            token.text.clone()
        } else {
            let mut text = std::mem::take(&mut carried);
            text.push_str(&token.text);
            text
        };
        runs.push(RunToken {
            raw: &raw[start..end],
            token: Token::spanning(&text, offset + start, end - start),
        });
    }

    runs
}

/// A character or entity reference at the start of `rest`, with its
/// length in bytes and its decoded text.
fn reference_at(rest: &str) -> Option<(usize, Cow<'_, str>)> {
    if !rest.starts_with('&') {
        return None;
    }
    let end = rest.find(';').filter(|&i| i <= MAX_REFERENCE_LEN)?;
    let reference = &rest[..=end];
    let text = unescape_with(reference, resolve_html5_entity).ok()?;
    Some((reference.len(), text))
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn slice(markup: &str, start: usize, end: usize) -> Result<&str, HighlightError> {
    markup.get(start..end).ok_or_else(|| HighlightError::Markup {
        position: start,
        message: "event boundary is not a character boundary".to_string(),
    })
}

fn tag_slice(markup: &str, start: usize, end: usize) -> Result<&str, HighlightError> {
    let raw = slice(markup, start, end)?;
    if raw.starts_with('<') && raw.ends_with('>') {
        Ok(raw)
    } else {
        Err(HighlightError::Markup {
            position: start,
            message: "tag position out of sync".to_string(),
        })
    }
}
