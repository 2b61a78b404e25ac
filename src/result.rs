use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use geo::{coord, Rect};

/// Axis-aligned rectangle in image pixel space, y growing downward.
///
/// Corners are always normalized on construction so that `x0 <= x1` and
/// `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle(Rect<i32>);

impl Rectangle {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        if x0 > x1 || y0 > y1 {
            log::warn!("Inverted rectangle corners ({x0}, {y0}) - ({x1}, {y1}), normalizing.");
        }
        Self(Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }))
    }

    pub fn x0(&self) -> i32 {
        self.0.min().x
    }

    pub fn y0(&self) -> i32 {
        self.0.min().y
    }

    pub fn x1(&self) -> i32 {
        self.0.max().x
    }

    pub fn y1(&self) -> i32 {
        self.0.max().y
    }

    pub fn width(&self) -> i32 {
        self.0.width()
    }

    pub fn height(&self) -> i32 {
        self.0.height()
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::new(
            self.x0().min(other.x0()),
            self.y0().min(other.y0()),
            self.x1().max(other.x1()),
            self.y1().max(other.y1()),
        )
    }

    /// The `bbox x0 y0 x1 y1` clause used in hOCR `title` attributes.
    pub fn bbox(&self) -> String {
        format!("bbox {self}")
    }

    /// Sort key: top of upper corner, top of lower corner, then left, then right.
    fn sort_key(&self) -> (i32, i32, i32, i32) {
        (self.y0(), self.y1(), self.x0(), self.x1())
    }

    /// The historical 32 bit position hash: each coordinate truncated to 8 bits.
    fn packed(&self) -> u32 {
        (self.x0() as u32 & 0xFF)
            | (self.y0() as u32 & 0xFF) << 8
            | (self.x1() as u32 & 0xFF) << 16
            | (self.y1() as u32 & 0xFF) << 24
    }
}

impl From<Rect<i32>> for Rectangle {
    fn from(rect: Rect<i32>) -> Self {
        Self(rect)
    }
}

impl From<Rectangle> for Rect<i32> {
    fn from(rect: Rectangle) -> Self {
        rect.0
    }
}

impl PartialOrd for Rectangle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rectangle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x0(), self.y0(), self.x1(), self.y1())
    }
}

/// One recognized element (a character or a word) and where it sits on the image.
///
/// Ordering, equality and hashing only look at the position: two boxes at the
/// same place compare equal whatever their content. Use
/// [`TextBox::is_identical_to`] when the content matters too.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub content: String,
    pub position: Rectangle,
    pub confidence: Option<f32>,
}

impl TextBox {
    pub fn new(content: impl Into<String>, position: Rectangle) -> Self {
        Self {
            content: content.into(),
            position,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: Option<f32>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn is_identical_to(&self, other: &TextBox) -> bool {
        self.position == other.position && self.content == other.content
    }

    pub fn legacy_hash(&self) -> u32 {
        self.position.packed()
    }
}

impl PartialEq for TextBox {
    fn eq(&self, other: &Self) -> bool {
        self.position.sort_key() == other.position.sort_key()
    }
}

impl Eq for TextBox {}

impl PartialOrd for TextBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TextBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

impl Hash for TextBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.sort_key().hash(state);
    }
}

impl fmt::Display for TextBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.content, self.position)
    }
}

/// A recognized line of text and the word boxes it contains, in reading order.
#[derive(Debug, Clone)]
pub struct LineBox {
    pub word_boxes: Vec<TextBox>,
    pub position: Rectangle,
}

impl LineBox {
    pub fn new(word_boxes: Vec<TextBox>, position: Rectangle) -> Self {
        Self {
            word_boxes,
            position,
        }
    }

    /// Word contents joined by single spaces.
    pub fn content(&self) -> String {
        self.word_boxes
            .iter()
            .map(|word| word.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn is_identical_to(&self, other: &LineBox) -> bool {
        self.position == other.position
            && self.word_boxes.len() == other.word_boxes.len()
            && self
                .word_boxes
                .iter()
                .zip(&other.word_boxes)
                .all(|(a, b)| a.is_identical_to(b))
    }

    pub fn legacy_hash(&self) -> u32 {
        self.position.packed()
    }
}

impl PartialEq for LineBox {
    fn eq(&self, other: &Self) -> bool {
        self.position.sort_key() == other.position.sort_key()
    }
}

impl Eq for LineBox {}

impl PartialOrd for LineBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

impl Hash for LineBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.sort_key().hash(state);
    }
}

impl fmt::Display for LineBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for word in &self.word_boxes {
            writeln!(f, "  {word}")?;
        }
        write!(f, "] {}", self.position)
    }
}
