//! XML reader for xmlbind.
//!
//! Parses XML text into an xmlbind [`Element`] tree. Input is treated as
//! untrusted: a leading byte-order mark is stripped, entity references other
//! than the predefined and character references are rejected, and DOCTYPE
//! declarations are skipped without being interpreted.
//!
//! Namespace prefixes are dropped from element and attribute names and
//! `xmlns` declarations are not kept as attributes. Text, whitespace
//! included, is kept as written.
//!
//! # Example
//!
//! ```
//! use xmlbind_read_xml::parse;
//!
//! let root = parse(r#"<node tag="web"><size>small</size></node>"#).unwrap();
//! assert_eq!(root.attribute("tag"), Some("web"));
//! assert_eq!(root.first_element("size").unwrap().text_content(), "small");
//! ```

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::{EscapeError, unescape};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use xmlbind_core::Element;

/// The byte-order-mark codepoint.
pub const BOM: char = '\u{FEFF}';

/// Error during reading.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("document is empty")]
    Empty,
    #[error("malformed markup at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: u64,
        #[source]
        source: AttrError,
    },
    #[error("cannot resolve reference in `{raw}`: {source}")]
    Escape {
        raw: String,
        #[source]
        source: EscapeError,
    },
    #[error("invalid UTF-8 in markup: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("element `{name}` is not closed")]
    Unclosed { name: String },
    #[error("closing tag `{name}` has no matching opening tag")]
    UnexpectedEnd { name: String },
    #[error("text outside the root element")]
    TextOutsideRoot,
    #[error("document has more than one root element")]
    MultipleRoots,
    #[error("document has no root element")]
    NoRoot,
}

/// Remove a single leading byte-order mark.
pub fn strip_bom(input: &str) -> &str {
    input.strip_prefix(BOM).unwrap_or(input)
}

/// Parse XML text into its root element.
pub fn parse(input: &str) -> Result<Element, ReadError> {
    let input = strip_bom(input);
    if input.trim().is_empty() {
        return Err(ReadError::Empty);
    }

    let mut reader = Reader::from_str(input);
    let mut builder = TreeBuilder::new();
    builder.parse(&mut reader)?;
    builder.finish()
}

struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    fn parse(&mut self, reader: &mut Reader<&[u8]>) -> Result<(), ReadError> {
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = open(&e, reader)?;
                    self.stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    let element = open(&e, reader)?;
                    self.close(element)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.stack.pop().ok_or_else(|| ReadError::UnexpectedEnd {
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    })?;
                    self.close(element)?;
                }
                Ok(Event::Text(e)) => {
                    let raw = std::str::from_utf8(&e)?;
                    self.text(&resolve(raw)?)?;
                }
                Ok(Event::CData(e)) => {
                    self.text(std::str::from_utf8(&e)?)?;
                }
                Ok(Event::GeneralRef(e)) => {
                    let name = std::str::from_utf8(&e)?;
                    self.text(&resolve(&format!("&{name};"))?)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Declarations, comments, processing instructions, DOCTYPE
                Err(e) => {
                    return Err(ReadError::Syntax {
                        position: reader.error_position() as u64,
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), ReadError> {
        match self.stack.last_mut() {
            Some(element) => {
                element.push_text(text);
                Ok(())
            }
            None if text.chars().all(char::is_whitespace) => Ok(()),
            None => Err(ReadError::TextOutsideRoot),
        }
    }

    fn close(&mut self, element: Element) -> Result<(), ReadError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.push_child(element);
        } else if self.root.is_none() {
            self.root = Some(element);
        } else {
            return Err(ReadError::MultipleRoots);
        }
        Ok(())
    }

    fn finish(self) -> Result<Element, ReadError> {
        if let Some(open) = self.stack.last() {
            return Err(ReadError::Unclosed {
                name: open.name.clone(),
            });
        }
        self.root.ok_or(ReadError::NoRoot)
    }
}

fn open(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, ReadError> {
    let local = e.local_name();
    let mut element = Element::new(std::str::from_utf8(local.as_ref())?);

    for attr in e.attributes() {
        let attr = attr.map_err(|source| ReadError::Attribute {
            position: reader.buffer_position() as u64,
            source,
        })?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let local = attr.key.local_name();
        let name = std::str::from_utf8(local.as_ref())?;
        let value = resolve(std::str::from_utf8(&attr.value)?)?;
        element.set_attribute(name, value);
    }

    Ok(element)
}

/// Resolve predefined entity and character references.
fn resolve(raw: &str) -> Result<String, ReadError> {
    unescape(raw)
        .map(Cow::into_owned)
        .map_err(|source| ReadError::Escape {
            raw: raw.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlbind_core::Content;

    #[test]
    fn test_parse_simple() {
        let root = parse(r#"<?xml version="1.0"?><node tag="web"><size>small</size></node>"#)
            .unwrap();
        assert_eq!(root.name, "node");
        assert_eq!(root.attribute("tag"), Some("web"));
        assert_eq!(root.first_element("size").unwrap().text_content(), "small");
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{FEFF}<a/>"), "<a/>");
        assert_eq!(strip_bom("<a/>"), "<a/>");
        // Only one mark is removed.
        assert_eq!(strip_bom("\u{FEFF}\u{FEFF}<a/>"), "\u{FEFF}<a/>");

        let with_bom = parse("\u{FEFF}<node><os>linux</os></node>").unwrap();
        let without = parse("<node><os>linux</os></node>").unwrap();
        assert_eq!(with_bom, without);
    }

    #[test]
    fn test_whitespace_kept() {
        let mut root = parse("<node>\n  <os>linux</os>\n  <size> </size>\n</node>\n").unwrap();
        assert_eq!(root.children.len(), 5);
        assert_eq!(root.first_element("size").unwrap().text_content(), " ");

        root.strip_indentation();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.first_element("size").unwrap().text_content(), " ");
    }

    #[test]
    fn test_mixed_content_kept() {
        let root = parse("<p><b>bold</b> <i>italic</i></p>").unwrap();
        assert_eq!(
            root.children,
            vec![
                Content::Element(Element::new("b").text("bold")),
                Content::Text(" ".into()),
                Content::Element(Element::new("i").text("italic")),
            ]
        );
        assert!(root.has_mixed_content());
    }

    #[test]
    fn test_references() {
        let root = parse(r#"<t a="&lt;&quot;x&quot;&gt;">&amp; &#65;&#x42; <![CDATA[<raw>]]></t>"#)
            .unwrap();
        assert_eq!(root.attribute("a"), Some(r#"<"x">"#));
        assert_eq!(root.text_content(), "& AB <raw>");
        assert_eq!(root.children.len(), 1);
        assert!(matches!(root.children[0], Content::Text(_)));
    }

    #[test]
    fn test_namespaces() {
        let root = parse(r#"<n:node xmlns="urn:a" xmlns:n="urn:n" n:tag="x"><n:os>bsd</n:os></n:node>"#)
            .unwrap();
        assert_eq!(root.name, "node");
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(root.attribute("tag"), Some("x"));
        assert!(root.first_element("os").is_some());
    }

    #[test]
    fn test_empty() {
        assert!(matches!(parse(""), Err(ReadError::Empty)));
        assert!(matches!(parse("\u{FEFF}  \n"), Err(ReadError::Empty)));
    }

    #[test]
    fn test_unclosed() {
        let err = parse("<root><unclosed>").unwrap_err();
        assert!(matches!(
            err,
            ReadError::Unclosed { .. } | ReadError::Syntax { .. }
        ));
    }

    #[test]
    fn test_mismatched_end() {
        assert!(parse("<a><b></a></b>").is_err());
        assert!(parse("<a></a></b>").is_err());
    }

    #[test]
    fn test_multiple_roots() {
        assert!(matches!(parse("<a/><b/>"), Err(ReadError::MultipleRoots)));
    }

    #[test]
    fn test_text_outside_root() {
        assert!(matches!(parse("<a/>trailing"), Err(ReadError::TextOutsideRoot)));
        assert!(matches!(parse("just text"), Err(ReadError::TextOutsideRoot)));
    }

    #[test]
    fn test_no_root() {
        assert!(matches!(parse("<?xml version=\"1.0\"?><!-- c -->"), Err(ReadError::NoRoot)));
    }

    #[test]
    fn test_duplicate_attribute() {
        assert!(matches!(
            parse(r#"<a x="1" x="2"/>"#),
            Err(ReadError::Attribute { .. })
        ));
    }

    #[test]
    fn test_custom_entities_not_expanded() {
        let input = r#"<!DOCTYPE r [<!ENTITY boom "kaboom">]><r>&boom;</r>"#;
        assert!(matches!(parse(input), Err(ReadError::Escape { .. })));

        let plain = parse(r#"<!DOCTYPE r SYSTEM "r.dtd"><r>ok</r>"#).unwrap();
        assert_eq!(plain.text_content(), "ok");
    }
}
