//! Builders select the shape of a recognition result: raw text, word boxes,
//! line boxes or character boxes. Each one knows which flags the engine needs
//! to produce that shape, how to read the engine's output file, and how to
//! write a result back out. The text and box builders can also be fed word by
//! word through [`IncrementalBuilder`].

use std::{
    fmt,
    io::{Read, Write},
};

use crate::{Rectangle, Result};

mod char_box;
mod line_box;
mod text;
mod word_box;

pub use char_box::CharBoxBuilder;
pub use line_box::LineBoxBuilder;
pub use text::{DigitBuilder, TextBuilder};
pub use word_box::WordBoxBuilder;

pub trait Builder: fmt::Display {
    type Output;

    /// Extensions the engine may give its output file, in the order to try them.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Arguments for the command line Tesseract engine.
    fn tesseract_configs(&self) -> Vec<String>;

    /// Arguments for the Cuneiform engine, empty when it can't produce this output.
    fn cuneiform_args(&self) -> &'static [&'static str];

    fn tesseract_layout(&self) -> PageSegMode;

    fn read<R: Read>(&self, reader: R) -> Result<Self::Output>;

    fn write<W: Write>(&self, writer: W, output: &Self::Output) -> Result<()>;
}

/// Builds a result from words handed over one at a time, as an engine's
/// result iterator walks the page.
pub trait IncrementalBuilder {
    type Output;

    fn start_line(&mut self, position: Rectangle);

    fn add_word(&mut self, content: &str, position: Rectangle, confidence: Option<f32>);

    fn end_line(&mut self);

    /// Takes everything accumulated so far, leaving the builder empty.
    fn get_output(&mut self) -> Self::Output;
}

/// Tesseract page segmentation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSegMode {
    OsdOnly = 0,
    AutoOsd = 1,
    AutoOnly = 2,
    #[default]
    Auto = 3,
    SingleColumn = 4,
    SingleBlockVertText = 5,
    SingleBlock = 6,
    SingleLine = 7,
    SingleWord = 8,
    CircleWord = 9,
    SingleChar = 10,
    SparseText = 11,
    SparseTextOsd = 12,
    RawLine = 13,
}

impl PageSegMode {
    pub(crate) fn args(self) -> Vec<String> {
        vec!["--psm".to_string(), (self as u8).to_string()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Text,
    Digits,
    WordBoxes,
    LineBoxes,
    CharBoxes,
}

/// The engine front-ends the builders know how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// The `tesseract` executable, reading back its output files.
    Tesseract,
    /// Tesseract driven in-process through its result iterator.
    LibTesseract,
    Cuneiform,
}

impl Engine {
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Tesseract => "Tesseract (sh)",
            Engine::LibTesseract => "Tesseract (C-API)",
            Engine::Cuneiform => "Cuneiform (sh)",
        }
    }

    pub fn available_builders(&self) -> &'static [BuilderKind] {
        match self {
            Engine::Tesseract => &[
                BuilderKind::LineBoxes,
                BuilderKind::Text,
                BuilderKind::WordBoxes,
                BuilderKind::CharBoxes,
                BuilderKind::Digits,
            ],
            Engine::LibTesseract => &[
                BuilderKind::Text,
                BuilderKind::Digits,
                BuilderKind::WordBoxes,
                BuilderKind::LineBoxes,
            ],
            Engine::Cuneiform => &[BuilderKind::Text, BuilderKind::WordBoxes],
        }
    }

    pub fn supports(&self, kind: BuilderKind) -> bool {
        self.available_builders().contains(&kind)
    }
}

/// Reads the whole stream, replacing invalid UTF-8 the way engine output files
/// are usually opened.
pub(crate) fn read_lossy<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
