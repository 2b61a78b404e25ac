//! Flat start-tag / text / end-tag event sequence over an hOCR-like document,
//! and the helpers used to write such documents back out.

use std::io::Write;

use quick_xml::{
    escape::{escape, unescape},
    events::Event,
    Reader,
};
use tracing::instrument;

pub(crate) const XHTML_HEADER: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN"
 "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<head>
	<meta http-equiv="content-type" content="text/html; charset=utf-8" />
</head>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Tag {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_span(&self) -> bool {
        self.name.eq_ignore_ascii_case("span")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Start(Tag),
    Text(String),
    End(String),
}

impl MarkupEvent {
    pub fn is_span_end(&self) -> bool {
        matches!(self, MarkupEvent::End(name) if name.eq_ignore_ascii_case("span"))
    }
}

/// Resolves XML entities and character references in `raw`, keeping any
/// entity it does not know (HTML's `&nbsp;`, a stray `&`) as written.
fn unescape_lenient(raw: &str) -> String {
    if let Ok(text) = unescape(raw) {
        return text.into_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        // A new '&' before the ';' means this one starts no entity.
        let end = tail[1..]
            .find(|c: char| c == ';' || c == '&')
            .map(|i| i + 1)
            .filter(|&i| tail.as_bytes()[i] == b';');
        match end {
            Some(end) => {
                let entity = &tail[..=end];
                match unescape(entity) {
                    Ok(resolved) => out.push_str(&resolved),
                    Err(_) => out.push_str(entity),
                }
                rest = &tail[end + 1..];
            }
            None => {
                let next = tail[1..].find('&').map_or(tail.len(), |i| i + 1);
                out.push_str(&tail[..next]);
                rest = &tail[next..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Tokenizes `document` into markup events.
///
/// Self-closing elements come out as a start/end pair and end tag names are
/// not checked against their start tags. A tokenizer error ends the sequence
/// at that point.
#[instrument(level = "debug", skip(document))]
pub fn events(document: &str) -> Vec<MarkupEvent> {
    let mut reader = Reader::from_str(document);
    reader
        .trim_text(false)
        .check_end_names(false)
        .expand_empty_elements(true);

    let mut events = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let attributes = start
                    .html_attributes()
                    .filter_map(|attr| match attr {
                        Ok(attr) => {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                            let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));
                            Some((key, value))
                        }
                        Err(e) => {
                            log::trace!("Skipping malformed attribute: {e}");
                            None
                        }
                    })
                    .collect();
                events.push(MarkupEvent::Start(Tag {
                    name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
                    attributes,
                }));
            }
            Ok(Event::End(end)) => {
                events.push(MarkupEvent::End(
                    String::from_utf8_lossy(end.name().as_ref()).to_string(),
                ));
            }
            Ok(Event::Text(text)) => {
                events.push(MarkupEvent::Text(unescape_lenient(&String::from_utf8_lossy(
                    &text,
                ))));
            }
            Ok(Event::CData(data)) => {
                events.push(MarkupEvent::Text(String::from_utf8_lossy(&data).to_string()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "Markup error at position {}, ignoring the rest: {e:?}",
                    reader.buffer_position()
                );
                break;
            }
            _ => {}
        }
    }
    log::trace!("Tokenized {} markup events", events.len());
    events
}

/// A `span` element carrying an hOCR class and title, with already-serialized
/// children.
pub(crate) fn span(class: &str, title: &str, children: &str) -> String {
    format!(
        "<span class=\"{class}\" title=\"{}\">{children}</span>",
        escape(title)
    )
}

pub(crate) fn text(content: &str) -> String {
    escape(content).to_string()
}

/// Writes the document header, then each element on its own line inside the body.
pub(crate) fn write_document<W: Write>(
    mut writer: W,
    elements: impl IntoIterator<Item = String>,
) -> std::io::Result<()> {
    writer.write_all(XHTML_HEADER.as_bytes())?;
    writer.write_all(b"<body>\n")?;
    for element in elements {
        writer.write_all(element.as_bytes())?;
        writer.write_all(b"<br/>\n")?;
    }
    writer.write_all(b"</body>\n")?;
    writer.flush()
}
