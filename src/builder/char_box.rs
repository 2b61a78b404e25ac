use std::{
    fmt,
    io::{Read, Write},
};

use tracing::instrument;

use super::{read_lossy, Builder, PageSegMode};
use crate::{Rectangle, Result, TextBox};

/// Records shorter than this are not box records.
const MIN_FIELDS: usize = 6;

/// One [`TextBox`] per recognized character, read from Tesseract box files
/// (`char x0 y0 x1 y1 page`, one per line).
///
/// Boxes are kept in file order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharBoxBuilder;

impl CharBoxBuilder {
    pub fn new() -> Self {
        Self
    }
}

/// Whether a record with this content survives a whitespace-split read.
fn is_readable(content: &str) -> bool {
    !content.is_empty() && !content.contains(char::is_whitespace)
}

fn parse_record(line: &str) -> Option<TextBox> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if fields.len() < MIN_FIELDS {
        return None;
    }
    let coords = fields[1..5]
        .iter()
        .map(|field| field.parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>();
    match coords.as_deref() {
        Ok(&[x0, y0, x1, y1]) => Some(TextBox::new(fields[0], Rectangle::new(x0, y0, x1, y1))),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Skipping box record {line:?}: {e}");
            None
        }
    }
}

impl Builder for CharBoxBuilder {
    type Output = Vec<TextBox>;

    fn file_extensions(&self) -> &'static [&'static str] {
        &["box"]
    }

    fn tesseract_configs(&self) -> Vec<String> {
        vec!["batch.nochop".to_string(), "makebox".to_string()]
    }

    fn cuneiform_args(&self) -> &'static [&'static str] {
        &[]
    }

    fn tesseract_layout(&self) -> PageSegMode {
        PageSegMode::default()
    }

    #[instrument(level = "debug", skip(self, reader))]
    fn read<R: Read>(&self, reader: R) -> Result<Vec<TextBox>> {
        let boxes = read_lossy(reader)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(parse_record)
            .collect::<Vec<_>>();
        log::debug!("Read {} char boxes", boxes.len());
        Ok(boxes)
    }

    fn write<W: Write>(&self, mut writer: W, output: &Vec<TextBox>) -> Result<()> {
        for char_box in output {
            if !is_readable(&char_box.content) {
                log::warn!("Writing box record {char_box:?} that will not read back");
            }
            writeln!(writer, "{char_box} 0")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for CharBoxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Character boxes")
    }
}
