//! Building results from a live engine iterator instead of an output file.

use tracing::instrument;

use crate::{builder::IncrementalBuilder, Error, Rectangle, Result};

/// Granularity of a page iterator query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIteratorLevel {
    Block,
    Para,
    TextLine,
    Word,
    Symbol,
}

/// A position in the engine's recognition result, walked word by word.
///
/// The cursor is owned and released by the caller; [`recognize`] only reads
/// from it and advances it.
pub trait PageCursor {
    /// Whether the cursor sits on the first element of a `level` element.
    fn is_at_beginning_of(&self, level: PageIteratorLevel) -> bool;

    /// Whether the current `element` is the last one inside its `level` element.
    fn is_at_final_element(&self, level: PageIteratorLevel, element: PageIteratorLevel) -> bool;

    fn bounding_box(&self, level: PageIteratorLevel) -> Option<Rectangle>;

    fn text(&self, level: PageIteratorLevel) -> Option<String>;

    fn confidence(&self, _level: PageIteratorLevel) -> Option<f32> {
        None
    }

    /// Moves to the next `level` element, returning `false` once exhausted.
    fn next(&mut self, level: PageIteratorLevel) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Idle,
    InLine,
}

/// Drives `builder` with every word of `cursor` and returns its output.
///
/// `None` means the engine had no result iterator to give, which is reported
/// as [`Error::NothingRecognized`] rather than as an empty result.
#[instrument(level = "debug", skip(cursor, builder))]
pub fn recognize<C, B>(cursor: Option<C>, builder: &mut B) -> Result<B::Output>
where
    C: PageCursor,
    B: IncrementalBuilder,
{
    let mut cursor = cursor.ok_or(Error::NothingRecognized)?;
    let mut state = LineState::Idle;
    let mut words = 0usize;

    loop {
        if cursor.is_at_beginning_of(PageIteratorLevel::TextLine) {
            if state == LineState::InLine {
                log::debug!("New line started before the previous one ended, closing it");
                builder.end_line();
            }
            let Some(line_box) = cursor.bounding_box(PageIteratorLevel::TextLine) else {
                // Nothing of a failed run may leak into the builder's next output.
                let _ = builder.get_output();
                return Err(Error::MissingBoundingBox(PageIteratorLevel::TextLine));
            };
            builder.start_line(line_box);
            state = LineState::InLine;
        }

        let last_word_in_line =
            cursor.is_at_final_element(PageIteratorLevel::TextLine, PageIteratorLevel::Word);

        match cursor.text(PageIteratorLevel::Word) {
            Some(word) if !word.is_empty() => {
                match cursor.bounding_box(PageIteratorLevel::Word) {
                    Some(word_box) => {
                        let confidence = cursor.confidence(PageIteratorLevel::Word);
                        log::trace!("Word {word:?} at {word_box}");
                        builder.add_word(&word, word_box, confidence);
                        words += 1;
                    }
                    None => log::warn!("Skipping word {word:?} without a bounding box"),
                }
            }
            _ => log::trace!("Skipping empty word"),
        }

        // Engines may end a line with an empty word, the line still ends here.
        if last_word_in_line {
            builder.end_line();
            state = LineState::Idle;
        }

        if !cursor.next(PageIteratorLevel::Word) {
            break;
        }
    }

    if state == LineState::InLine {
        log::debug!("Iterator exhausted inside a line, closing it");
        builder.end_line();
    }
    log::debug!("Recognized {words} words");
    Ok(builder.get_output())
}
