use std::{
    fmt,
    io::{Read, Write},
};

use tracing::instrument;

use super::{read_lossy, Builder, IncrementalBuilder, PageSegMode};
use crate::{Rectangle, Result};

/// Raw text, as-is from the engine.
#[derive(Debug, Clone, Default)]
pub struct TextBuilder {
    layout: PageSegMode,
    lines: Vec<String>,
    current_line: Option<String>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: PageSegMode) -> Self {
        self.layout = layout;
        self
    }
}

impl Builder for TextBuilder {
    type Output = String;

    fn file_extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn tesseract_configs(&self) -> Vec<String> {
        self.layout.args()
    }

    fn cuneiform_args(&self) -> &'static [&'static str] {
        &["-f", "text"]
    }

    fn tesseract_layout(&self) -> PageSegMode {
        self.layout
    }

    #[instrument(level = "debug", skip(self, reader))]
    fn read<R: Read>(&self, reader: R) -> Result<String> {
        Ok(read_lossy(reader)?.trim().to_string())
    }

    fn write<W: Write>(&self, mut writer: W, output: &String) -> Result<()> {
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl IncrementalBuilder for TextBuilder {
    type Output = String;

    fn start_line(&mut self, _position: Rectangle) {
        if self.current_line.is_some() {
            self.end_line();
        }
        self.current_line = Some(String::new());
    }

    fn add_word(&mut self, content: &str, _position: Rectangle, _confidence: Option<f32>) {
        let line = self.current_line.get_or_insert_with(String::new);
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(content);
    }

    fn end_line(&mut self) {
        if let Some(line) = self.current_line.take() {
            self.lines.push(line);
        }
    }

    fn get_output(&mut self) -> String {
        self.end_line();
        let text = self.lines.join("\n");
        self.lines.clear();
        text.trim().to_string()
    }
}

impl fmt::Display for TextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Raw text")
    }
}

/// Raw text, with the engine told to only expect digits.
#[derive(Debug, Clone, Default)]
pub struct DigitBuilder {
    text: TextBuilder,
}

impl DigitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: PageSegMode) -> Self {
        self.text = self.text.layout(layout);
        self
    }
}

impl Builder for DigitBuilder {
    type Output = String;

    fn file_extensions(&self) -> &'static [&'static str] {
        self.text.file_extensions()
    }

    fn tesseract_configs(&self) -> Vec<String> {
        let mut configs = self.text.tesseract_configs();
        configs.push("digits".to_string());
        configs
    }

    fn cuneiform_args(&self) -> &'static [&'static str] {
        self.text.cuneiform_args()
    }

    fn tesseract_layout(&self) -> PageSegMode {
        self.text.tesseract_layout()
    }

    fn read<R: Read>(&self, reader: R) -> Result<String> {
        self.text.read(reader)
    }

    fn write<W: Write>(&self, writer: W, output: &String) -> Result<()> {
        self.text.write(writer, output)
    }
}

impl IncrementalBuilder for DigitBuilder {
    type Output = String;

    fn start_line(&mut self, position: Rectangle) {
        self.text.start_line(position)
    }

    fn add_word(&mut self, content: &str, position: Rectangle, confidence: Option<f32>) {
        self.text.add_word(content, position, confidence)
    }

    fn end_line(&mut self) {
        self.text.end_line()
    }

    fn get_output(&mut self) -> String {
        self.text.get_output()
    }
}

impl fmt::Display for DigitBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digits only")
    }
}
