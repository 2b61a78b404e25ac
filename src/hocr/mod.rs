//! hOCR-like markup parsing.
//!
//! Two dialects are understood. Tesseract tags every word with its own
//! bounding box ([`word`]). Cuneiform only tags lines, and gives the position
//! of every character of the line in a separate `ocr_cinfo` element
//! ([`cinfo`]). The word-tagged dialect is always tried first since it
//! carries real word boundaries.

use tracing::instrument;

use crate::{markup::MarkupEvent, LineBox, Rectangle, Result, TextBox};

pub mod cinfo;
pub mod word;

pub use cinfo::CharPositionParser;
pub use word::{ParseEvent, WordTaggedParser};

/// Role of a `span` element, taken from its `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    Word,
    Line,
    CharInfo,
    Unrecognized,
}

impl TagRole {
    /// `ocr_word` is the older spelling of `ocrx_word`, both mean a word.
    pub fn classify(class: Option<&str>) -> TagRole {
        class
            .into_iter()
            .flat_map(str::split_whitespace)
            .find_map(|class| match class {
                "ocrx_word" | "ocr_word" => Some(TagRole::Word),
                "ocr_line" => Some(TagRole::Line),
                "ocr_cinfo" => Some(TagRole::CharInfo),
                _ => None,
            })
            .unwrap_or(TagRole::Unrecognized)
    }
}

/// Extracts the rectangle from a `title` attribute such as
/// `bbox 36 92 618 184; baseline 0 -3; x_wconf 91`.
pub fn parse_bbox(title: &str) -> Result<Rectangle> {
    let clause = title
        .split(';')
        .map(str::trim)
        .find(|clause| clause.starts_with("bbox"))
        .ok_or_else(|| crate::Error::InvalidBoundingBox(title.to_string()))?;
    let coords = clause
        .split_whitespace()
        .skip(1)
        .take(4)
        .map(|value| value.parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::Error::InvalidBoundingBox(format!("{title}: {e}")))?;
    match coords[..] {
        [x0, y0, x1, y1] => Ok(Rectangle::new(x0, y0, x1, y1)),
        _ => Err(crate::Error::InvalidBoundingBox(title.to_string())),
    }
}

/// Word confidence from the `x_wconf` clause of a `title` attribute.
pub fn parse_confidence(title: &str) -> Option<f32> {
    title
        .split(';')
        .map(str::trim)
        .find_map(|clause| clause.strip_prefix("x_wconf"))
        .and_then(|value| value.trim().parse().ok())
}

/// Parses per-character positions from an `ocr_cinfo` title such as
/// `x_bboxes 10 0 15 12 -1 -1 -1 -1 16 0 20 12`.
///
/// The leading `x_bboxes` token is dropped and every `-1` placeholder is
/// removed, so the result holds four values per positioned character.
pub fn parse_char_positions(title: &str) -> Result<Vec<i32>> {
    title
        .split_whitespace()
        .skip(1)
        .filter(|token| *token != "-1")
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|e| crate::Error::InvalidBoundingBox(format!("{token}: {e}")))
        })
        .collect()
}

/// Word boxes from a completed markup document, falling back to the
/// char-position dialect when no word-tagged element is found.
#[instrument(level = "debug", skip(events))]
pub fn read_word_boxes(events: &[MarkupEvent]) -> Vec<TextBox> {
    let (words, _) = read_word_tagged(events);
    if !words.is_empty() {
        return words;
    }
    log::debug!("No word-tagged boxes found, trying the char-position dialect.");
    let boxes = CharPositionParser::new().parse(events);
    log::debug!("Char-position dialect produced {} boxes", boxes.len());
    boxes
}

/// Line boxes from a completed markup document. With the char-position
/// dialect every word becomes its own single-word line.
#[instrument(level = "debug", skip(events))]
pub fn read_line_boxes(events: &[MarkupEvent]) -> Vec<LineBox> {
    let (words, lines) = read_word_tagged(events);
    if !words.is_empty() {
        return lines;
    }
    log::debug!("No word-tagged boxes found, trying the char-position dialect.");
    CharPositionParser::new()
        .parse(events)
        .into_iter()
        .map(|word| {
            let position = word.position;
            LineBox::new(vec![word], position)
        })
        .collect()
}

fn read_word_tagged(events: &[MarkupEvent]) -> (Vec<TextBox>, Vec<LineBox>) {
    let mut words = Vec::new();
    let mut lines = Vec::new();
    for event in WordTaggedParser::new().parse(events) {
        match event {
            ParseEvent::WordFound(word) => words.push(word),
            ParseEvent::LineClosed(line) => lines.push(line),
        }
    }
    log::debug!(
        "Word-tagged dialect produced {} words in {} lines",
        words.len(),
        lines.len()
    );
    (words, lines)
}
