use std::{
    fmt,
    io::{Read, Write},
};

use tracing::instrument;

use super::{read_lossy, Builder, IncrementalBuilder, PageSegMode};
use crate::{hocr, markup, Rectangle, Result, TextBox};

/// One [`TextBox`] per recognized word.
#[derive(Debug, Clone, Default)]
pub struct WordBoxBuilder {
    layout: PageSegMode,
    boxes: Vec<TextBox>,
}

impl WordBoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: PageSegMode) -> Self {
        self.layout = layout;
        self
    }
}

/// hOCR element for a single word.
pub(crate) fn word_element(word: &TextBox) -> String {
    let title = match word.confidence {
        Some(confidence) => format!("{}; x_wconf {confidence}", word.position.bbox()),
        None => word.position.bbox(),
    };
    markup::span("ocrx_word", &title, &markup::text(&word.content))
}

impl Builder for WordBoxBuilder {
    type Output = Vec<TextBox>;

    fn file_extensions(&self) -> &'static [&'static str] {
        &["html", "hocr"]
    }

    fn tesseract_configs(&self) -> Vec<String> {
        let mut configs = self.layout.args();
        configs.push("hocr".to_string());
        configs
    }

    fn cuneiform_args(&self) -> &'static [&'static str] {
        &["-f", "hocr"]
    }

    fn tesseract_layout(&self) -> PageSegMode {
        self.layout
    }

    #[instrument(level = "debug", skip(self, reader))]
    fn read<R: Read>(&self, reader: R) -> Result<Vec<TextBox>> {
        let document = read_lossy(reader)?;
        let boxes = hocr::read_word_boxes(&markup::events(&document));
        log::debug!("Read {} word boxes", boxes.len());
        Ok(boxes)
    }

    /// Writes a very simplified hOCR document.
    fn write<W: Write>(&self, writer: W, output: &Vec<TextBox>) -> Result<()> {
        markup::write_document(writer, output.iter().map(word_element))?;
        Ok(())
    }
}

impl IncrementalBuilder for WordBoxBuilder {
    type Output = Vec<TextBox>;

    fn start_line(&mut self, _position: Rectangle) {}

    fn add_word(&mut self, content: &str, position: Rectangle, confidence: Option<f32>) {
        self.boxes
            .push(TextBox::new(content, position).with_confidence(confidence));
    }

    fn end_line(&mut self) {}

    fn get_output(&mut self) -> Vec<TextBox> {
        std::mem::take(&mut self.boxes)
    }
}

impl fmt::Display for WordBoxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word boxes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(boxes: &Vec<TextBox>) -> Vec<TextBox> {
        let builder = WordBoxBuilder::new();
        let mut out = Vec::new();
        builder.write(&mut out, boxes).unwrap();
        builder.read(out.as_slice()).unwrap()
    }

    #[test]
    fn written_boxes_read_back_identical() {
        let boxes = vec![
            TextBox::new("Fish & <chips>", Rectangle::new(10, 5, 80, 20)),
            TextBox::new("l'été", Rectangle::new(90, 5, 120, 20)).with_confidence(Some(87.0)),
        ];
        let read = round_trip(&boxes);
        assert_eq!(read.len(), 2);
        for (a, b) in boxes.iter().zip(&read) {
            assert!(a.is_identical_to(b), "{a} != {b}");
        }
        assert_eq!(read[1].confidence, Some(87.0));
    }

    #[test]
    fn flags_and_extensions() {
        let builder = WordBoxBuilder::new().layout(PageSegMode::SingleBlock);
        assert_eq!(builder.tesseract_configs(), vec!["--psm", "6", "hocr"]);
        assert_eq!(builder.file_extensions(), &["html", "hocr"]);
        assert_eq!(builder.to_string(), "Word boxes");
    }

    #[test]
    fn collects_words_incrementally() {
        let mut builder = WordBoxBuilder::new();
        builder.start_line(Rectangle::new(0, 0, 20, 10));
        builder.add_word("a", Rectangle::new(0, 0, 5, 10), Some(50.0));
        builder.add_word("b", Rectangle::new(10, 0, 20, 10), None);
        builder.end_line();
        let boxes = builder.get_output();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].confidence, Some(50.0));
        assert!(builder.get_output().is_empty());
    }
}
