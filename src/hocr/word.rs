//! Parser for the word-tagged dialect, where every `ocrx_word` (or the older
//! `ocr_word`) span carries its own `bbox`, nested in `ocr_line` spans.

use tracing::instrument;

use super::{parse_bbox, parse_confidence, TagRole};
use crate::{markup::MarkupEvent, LineBox, Rectangle, TextBox};

#[derive(Debug, Clone)]
pub enum ParseEvent {
    WordFound(TextBox),
    LineClosed(LineBox),
}

#[derive(Debug)]
struct PendingWord {
    position: Rectangle,
    confidence: Option<f32>,
    text: String,
}

#[derive(Debug)]
struct PendingLine {
    position: Rectangle,
    words: Vec<TextBox>,
}

/// Turns markup events into [`ParseEvent`]s.
///
/// Every `span` start tag pushes its role on a stack, including spans that
/// were rejected (they push [`TagRole::Unrecognized`]), and every `span` end
/// tag pops one, so a malformed word never closes the line around it.
#[derive(Debug, Default)]
pub struct WordTaggedParser {
    tag_types: Vec<TagRole>,
    word: Option<PendingWord>,
    line: Option<PendingLine>,
}

impl WordTaggedParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<'a>(mut self, events: &'a [MarkupEvent]) -> impl Iterator<Item = ParseEvent> + 'a {
        events.iter().filter_map(move |event| self.feed(event))
    }

    pub fn feed(&mut self, event: &MarkupEvent) -> Option<ParseEvent> {
        match event {
            MarkupEvent::Start(tag) if tag.is_span() => {
                let role = TagRole::classify(tag.attribute("class"));
                let role = self.start(role, tag.attribute("title"));
                self.tag_types.push(role);
                None
            }
            MarkupEvent::Text(text) => {
                if let Some(word) = &mut self.word {
                    word.text.push_str(text);
                }
                None
            }
            MarkupEvent::End(_) if event.is_span_end() => match self.tag_types.pop() {
                Some(TagRole::Word) => self.end_word(),
                Some(TagRole::Line) => self.end_line(),
                Some(_) => None,
                None => {
                    log::trace!("Unbalanced span end tag ignored");
                    None
                }
            },
            _ => None,
        }
    }

    /// Opens the element for `role`, returning the role to push on the stack.
    #[instrument(level = "trace", skip(self))]
    fn start(&mut self, role: TagRole, title: Option<&str>) -> TagRole {
        match role {
            TagRole::Word => {
                let Some(position) = title.and_then(|title| parse_bbox(title).ok()) else {
                    log::warn!("Ignoring word without a valid position: {title:?}");
                    return TagRole::Unrecognized;
                };
                self.word = Some(PendingWord {
                    position,
                    confidence: title.and_then(parse_confidence),
                    text: String::new(),
                });
                TagRole::Word
            }
            TagRole::Line => {
                let position = match title.map(parse_bbox) {
                    Some(Ok(position)) => position,
                    Some(Err(e)) => {
                        log::warn!("Ignoring line: {e}");
                        self.line = None;
                        return TagRole::Unrecognized;
                    }
                    None => {
                        log::warn!("Ignoring line without a title");
                        self.line = None;
                        return TagRole::Unrecognized;
                    }
                };
                self.line = Some(PendingLine {
                    position,
                    words: Vec::new(),
                });
                TagRole::Line
            }
            // Char info only matters to the char-position dialect.
            TagRole::CharInfo | TagRole::Unrecognized => TagRole::Unrecognized,
        }
    }

    fn end_word(&mut self) -> Option<ParseEvent> {
        let word = self.word.take()?;
        let word = TextBox::new(word.text, word.position).with_confidence(word.confidence);
        log::trace!("Word found: {word}");
        if let Some(line) = &mut self.line {
            line.words.push(word.clone());
        }
        Some(ParseEvent::WordFound(word))
    }

    fn end_line(&mut self) -> Option<ParseEvent> {
        let line = self.line.take()?;
        Some(ParseEvent::LineClosed(LineBox::new(line.words, line.position)))
    }
}
