//! Normalizes the output of OCR engines into text, word boxes or line boxes.
//!
//! A result is built either by reading a finished engine output file with a
//! [`Builder`], or by walking a live engine iterator with [`recognize`] and an
//! [`IncrementalBuilder`].

pub mod builder;
pub mod cursor;
mod error;
pub mod hocr;
pub mod markup;
mod result;

pub use builder::{
    Builder, BuilderKind, CharBoxBuilder, DigitBuilder, Engine, IncrementalBuilder,
    LineBoxBuilder, PageSegMode, TextBuilder, WordBoxBuilder,
};
pub use cursor::{recognize, PageCursor, PageIteratorLevel};
pub use error::{Error, Result};
pub use result::*;
