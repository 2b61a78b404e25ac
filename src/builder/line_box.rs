use std::{
    fmt,
    io::{Read, Write},
};

use tracing::instrument;

use super::{read_lossy, word_box::word_element, Builder, IncrementalBuilder, PageSegMode};
use crate::{hocr, markup, LineBox, Rectangle, Result, TextBox};

/// One [`LineBox`] per recognized line, each holding its word boxes.
#[derive(Debug, Clone, Default)]
pub struct LineBoxBuilder {
    layout: PageSegMode,
    lines: Vec<LineBox>,
    current_line: Option<LineBox>,
}

impl LineBoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: PageSegMode) -> Self {
        self.layout = layout;
        self
    }
}

fn line_element(line: &LineBox) -> String {
    let words = line
        .word_boxes
        .iter()
        .map(|word| format!(" {}", word_element(word)))
        .collect::<String>();
    markup::span("ocr_line", &line.position.bbox(), &words)
}

impl Builder for LineBoxBuilder {
    type Output = Vec<LineBox>;

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
    fn read<R: Read>(&self, reader: R) -> Result<Vec<LineBox>> {
        let document = read_lossy(reader)?;
        let lines = hocr::read_line_boxes(&markup::events(&document));
        log::debug!("Read {} line boxes", lines.len());
        Ok(lines)
    }

    /// Writes a very simplified hOCR document.
    fn write<W: Write>(&self, writer: W, output: &Vec<LineBox>) -> Result<()> {
        markup::write_document(writer, output.iter().map(line_element))?;
        Ok(())
    }
}

impl IncrementalBuilder for LineBoxBuilder {
    type Output = Vec<LineBox>;

    fn start_line(&mut self, position: Rectangle) {
        if self.current_line.is_some() {
            self.end_line();
        }
        self.current_line = Some(LineBox::new(Vec::new(), position));
    }

    fn add_word(&mut self, content: &str, position: Rectangle, confidence: Option<f32>) {
        let line = self.current_line.get_or_insert_with(|| {
            log::warn!("Word {content:?} added outside of a line, opening one around it");
            LineBox::new(Vec::new(), position)
        });
        line.word_boxes
            .push(TextBox::new(content, position).with_confidence(confidence));
    }

    fn end_line(&mut self) {
        if let Some(line) = self.current_line.take() {
            self.lines.push(line);
        }
    }

    fn get_output(&mut self) -> Vec<LineBox> {
        self.end_line();
        std::mem::take(&mut self.lines)
    }
}

impl fmt::Display for LineBoxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line boxes")
    }
}
