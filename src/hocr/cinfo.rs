//! Parser for the char-position dialect: `ocr_line` spans hold the text of a
//! line and an `ocr_cinfo` span lists the rectangle of each character.
//! Spaces have `-1 -1 -1 -1` as position.

use tracing::instrument;

use super::{parse_char_positions, TagRole};
use crate::{markup::MarkupEvent, Rectangle, TextBox};

#[derive(Debug, Default)]
struct PendingLine {
    text: String,
    positions: Vec<i32>,
}

/// Rebuilds word boxes from per-character positions.
///
/// Words are found by splitting the line text on spaces, so OCR noise that
/// puts a space inside a word splits it in two.
#[derive(Debug, Default)]
pub struct CharPositionParser {
    tag_types: Vec<TagRole>,
    line: Option<PendingLine>,
}

impl CharPositionParser {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self, events))]
    pub fn parse(mut self, events: &[MarkupEvent]) -> Vec<TextBox> {
        events.iter().flat_map(|event| self.feed(event)).collect()
    }

    /// Returns the word boxes of a line when `event` closes it.
    pub fn feed(&mut self, event: &MarkupEvent) -> Vec<TextBox> {
        match event {
            MarkupEvent::Start(tag) if tag.is_span() => {
                let role = TagRole::classify(tag.attribute("class"));
                match role {
                    TagRole::Line => self.line = Some(PendingLine::default()),
                    TagRole::CharInfo => self.set_positions(tag.attribute("title")),
                    _ => {}
                }
                self.tag_types.push(role);
                Vec::new()
            }
            MarkupEvent::Text(text) => {
                if let Some(line) = &mut self.line {
                    line.text.push_str(text);
                }
                Vec::new()
            }
            MarkupEvent::End(_) if event.is_span_end() => match self.tag_types.pop() {
                Some(TagRole::Line) => self
                    .line
                    .take()
                    .map(|line| split_words(&line.text, &line.positions))
                    .unwrap_or_default(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn set_positions(&mut self, title: Option<&str>) {
        let Some(line) = &mut self.line else {
            log::trace!("Char positions outside of a line ignored");
            return;
        };
        line.positions = match title.map(parse_char_positions) {
            Some(Ok(positions)) => positions,
            Some(Err(e)) => {
                log::warn!("Ignoring char positions of line {:?}: {e}", line.text);
                Vec::new()
            }
            None => Vec::new(),
        };
    }
}

/// Splits `text` on spaces and gives each word the smallest rectangle holding
/// all of its characters, consuming four positions per character.
#[instrument(level = "trace")]
fn split_words(text: &str, positions: &[i32]) -> Vec<TextBox> {
    let mut remaining = positions;
    let mut boxes = Vec::new();
    for word in text.split(' ').filter(|word| !word.is_empty()) {
        let needed = 4 * word.chars().count();
        if remaining.len() < needed {
            log::warn!(
                "Char positions exhausted at word {word:?} ({} left, {needed} needed)",
                remaining.len()
            );
            break;
        }
        let (chars, rest) = remaining.split_at(needed);
        remaining = rest;

        let column = |offset: usize| chars.iter().skip(offset).step_by(4).copied();
        let (Some(left), Some(top), Some(right), Some(bottom)) = (
            column(0).min(),
            column(1).min(),
            column(2).max(),
            column(3).max(),
        ) else {
            continue;
        };
        let word = TextBox::new(word, Rectangle::new(left, top, right, bottom));
        log::trace!("Word found: {word}");
        boxes.push(word);
    }
    boxes
}
