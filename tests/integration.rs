use std::cmp::Ordering;

use ocrbox::{
    recognize, Builder, CharBoxBuilder, Error, LineBox, LineBoxBuilder, PageCursor,
    PageIteratorLevel, Rectangle, TextBox, WordBoxBuilder,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const TESSERACT_HOCR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN"
    "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">
 <head>
  <title></title>
  <meta http-equiv="Content-Type" content="text/html;charset=utf-8" />
  <meta name='ocr-system' content='tesseract 4.1.1' />
  <meta name='ocr-capabilities' content='ocr_page ocr_carea ocr_par ocr_line ocrx_word ocrp_wconf'/>
 </head>
 <body>
  <div class='ocr_page' id='page_1' title='image "test.png"; bbox 0 0 800 200; ppageno 0'>
   <div class='ocr_carea' id='block_1_1' title="bbox 36 40 612 150">
    <p class='ocr_par' id='par_1_1' lang='eng' title="bbox 36 40 612 150">
     <span class='ocr_line' id='line_1_1' title="bbox 36 40 612 80; baseline 0 -9; x_size 40; x_descenders 9; x_ascenders 10">
      <span class='ocrx_word' id='word_1_1' title='bbox 36 40 180 80; x_wconf 96'>This</span>
      <span class='ocrx_word' id='word_1_2' title='bbox 200 41 260 80; x_wconf 95'>is</span>
      <span class='ocrx_word' id='word_1_3' title='bbox 280 40 612 80; x_wconf 93'><strong>a&amp;test</strong></span>
     </span>
     <span class='ocr_line' id='line_1_2' title="bbox 36 110 400 150; baseline 0 -8; x_size 40">
      <span class='ocrx_word' id='word_1_4' title='bbox 36 110 200 150; x_wconf 91'>second</span>
      <span class='ocrx_word' id='word_1_5' title='bbox 220 110 400 150; x_wconf 89'>line</span>
     </span>
    </p>
   </div>
  </div>
 </body>
</html>
"#;

const CUNEIFORM_HOCR: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html>
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<meta name="ocr-system" content="cuneiform">
</head>
<body><div class="ocr_page" title="image 'test.bmp'; bbox 0 0 800 200">
<p><span class="ocr_line" id="line_1" title="bbox 10 10 100 30">Hi there<span class="ocr_cinfo" title="x_bboxes 10 10 20 30 20 12 28 30 -1 -1 -1 -1 40 10 50 30 50 11 60 30 60 10 70 29 70 10 80 30 80 12 100 30 "></span></span>
<br></p>
</div>
</body>
</html>
"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn reads_tesseract_word_boxes() {
    init_logging();

    let words = WordBoxBuilder::new().read(TESSERACT_HOCR.as_bytes()).unwrap();
    let contents = words.iter().map(|w| w.content.as_str()).collect::<Vec<_>>();
    assert_eq!(contents, vec!["This", "is", "a&test", "second", "line"]);
    assert_eq!(words[1].position, Rectangle::new(200, 41, 260, 80));
    assert_eq!(words[4].confidence, Some(89.0));
}

#[test]
fn reads_tesseract_line_boxes() {
    init_logging();

    let lines = LineBoxBuilder::new().read(TESSERACT_HOCR.as_bytes()).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].content(), "This is a&test");
    assert_eq!(lines[0].position, Rectangle::new(36, 40, 612, 80));
    assert_eq!(lines[1].content(), "second line");
}

#[test]
fn reads_cuneiform_through_the_fallback() {
    init_logging();

    let words = WordBoxBuilder::new().read(CUNEIFORM_HOCR.as_bytes()).unwrap();
    let found = words
        .iter()
        .map(|w| (w.content.as_str(), w.position))
        .collect::<Vec<_>>();
    assert_eq!(
        found,
        vec![
            ("Hi", Rectangle::new(10, 10, 28, 30)),
            ("there", Rectangle::new(40, 10, 100, 30)),
        ]
    );

    let lines = LineBoxBuilder::new().read(CUNEIFORM_HOCR.as_bytes()).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].content(), "there");
    assert_eq!(lines[1].position, lines[1].word_boxes[0].position);
}

#[test]
fn serialized_word_boxes_round_trip() {
    init_logging();

    let mut boxes = WordBoxBuilder::new().read(TESSERACT_HOCR.as_bytes()).unwrap();
    boxes.sort();

    let mut out = Vec::new();
    WordBoxBuilder::new().write(&mut out, &boxes).unwrap();
    let mut read = WordBoxBuilder::new().read(out.as_slice()).unwrap();
    read.sort();

    assert_eq!(read, boxes);
    assert!(boxes.iter().zip(&read).all(|(a, b)| a.is_identical_to(b)));
}

#[test]
fn serialized_line_boxes_round_trip() {
    init_logging();

    let lines = LineBoxBuilder::new().read(TESSERACT_HOCR.as_bytes()).unwrap();
    let mut out = Vec::new();
    LineBoxBuilder::new().write(&mut out, &lines).unwrap();
    let read = LineBoxBuilder::new().read(out.as_slice()).unwrap();

    assert_eq!(read, lines);
    assert!(lines.iter().zip(&read).all(|(a, b)| a.is_identical_to(b)));
}

#[test]
fn char_boxes_keep_write_order() {
    let boxes = vec![
        TextBox::new("T", Rectangle::new(36, 120, 60, 160)),
        TextBox::new("h", Rectangle::new(62, 120, 80, 162)),
        TextBox::new("i", Rectangle::new(1, 0, 5, 10)),
    ];
    let mut out = Vec::new();
    CharBoxBuilder::new().write(&mut out, &boxes).unwrap();
    let read = CharBoxBuilder::new().read(out.as_slice()).unwrap();

    assert_eq!(read.len(), boxes.len());
    assert!(boxes.iter().zip(&read).all(|(a, b)| a.is_identical_to(b)));
}

struct Replay {
    words: Vec<(&'static str, bool, bool)>,
    index: usize,
}

impl PageCursor for Replay {
    fn is_at_beginning_of(&self, _level: PageIteratorLevel) -> bool {
        self.words[self.index].1
    }

    fn is_at_final_element(&self, _level: PageIteratorLevel, _element: PageIteratorLevel) -> bool {
        self.words[self.index].2
    }

    fn bounding_box(&self, level: PageIteratorLevel) -> Option<Rectangle> {
        match level {
            PageIteratorLevel::Word => {
                let x = self.index as i32 * 20;
                Some(Rectangle::new(x, 0, x + 15, 10))
            }
            _ => Some(Rectangle::new(0, 0, 200, 10)),
        }
    }

    fn text(&self, _level: PageIteratorLevel) -> Option<String> {
        Some(self.words[self.index].0.to_string())
    }

    fn confidence(&self, _level: PageIteratorLevel) -> Option<f32> {
        Some(75.0)
    }

    fn next(&mut self, _level: PageIteratorLevel) -> bool {
        self.index += 1;
        self.index < self.words.len()
    }
}

#[test]
fn streaming_matches_file_shape() {
    init_logging();

    let cursor = Replay {
        words: vec![("one", true, false), ("two", false, false), ("", false, true)],
        index: 0,
    };
    let lines = recognize(Some(cursor), &mut LineBoxBuilder::new()).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].content(), "one two");
    assert_eq!(lines[0].word_boxes[0].confidence, Some(75.0));

    let nothing = recognize(None::<Replay>, &mut WordBoxBuilder::new());
    assert!(matches!(nothing, Err(Error::NothingRecognized)));
}

fn arb_box() -> impl Strategy<Value = TextBox> {
    (0..50i32, 0..50i32, 0..50i32, 0..50i32, "[a-z]{0,3}")
        .prop_map(|(x0, y0, x1, y1, content)| TextBox::new(content, Rectangle::new(x0, y0, x1, y1)))
}

proptest! {
    #[test]
    fn ordering_ignores_content(a in arb_box(), content in "[a-z]{1,5}") {
        let b = TextBox::new(content, a.position);
        prop_assert_eq!(a.cmp(&b), Ordering::Equal);
        prop_assert!(a == b);
    }

    #[test]
    fn ordering_is_total(a in arb_box(), b in arb_box(), c in arb_box()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
        prop_assert_eq!(a == b, a.position == b.position);
    }

    #[test]
    fn line_ordering_follows_position(a in arb_box(), b in arb_box()) {
        let la = LineBox::new(vec![a.clone()], a.position);
        let lb = LineBox::new(vec![b.clone()], b.position);
        prop_assert_eq!(la.cmp(&lb), a.cmp(&b));
    }
}
