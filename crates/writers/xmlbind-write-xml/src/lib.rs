//! XML writer for xmlbind.
//!
//! Emits an xmlbind [`Element`] tree as XML text, either compact or
//! pretty-printed with two-space indentation. Leaf text stays on the line of
//! its element, so pretty output reads back to the same tree. Elements that
//! mix text with child elements can only be written compact.
//!
//! # Example
//!
//! ```
//! use xmlbind_core::{Element, EmitOptions, Formatting};
//! use xmlbind_write_xml::emit_with_options;
//!
//! let root = Element::new("node").attr("tag", "web").child(Element::new("os").text("linux"));
//! let options = EmitOptions::new(Formatting::Pretty).without_declaration();
//! let xml = emit_with_options(&root, &options).unwrap();
//! assert_eq!(xml, "<node tag=\"web\">\n  <os>linux</os>\n</node>");
//! ```

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use xmlbind_core::{Content, Element, EmitOptions, Formatting, is_xml_char, is_xml_name};

/// Error during writing.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("`{0}` is not a valid element or attribute name")]
    InvalidName(String),
    #[error("character {ch:?} in `{context}` is not allowed in XML")]
    InvalidChar { ch: char, context: String },
    #[error("element `{0}` has mixed content and cannot be pretty-printed")]
    MixedContent(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Emit an element tree with default options (compact, with declaration).
pub fn emit(root: &Element) -> Result<String, WriteError> {
    emit_with_options(root, &EmitOptions::default())
}

/// Emit an element tree.
pub fn emit_with_options(root: &Element, options: &EmitOptions) -> Result<String, WriteError> {
    let pretty = options.format.is_pretty();
    let mut writer = match options.format {
        Formatting::Compact => Writer::new(Cursor::new(Vec::new())),
        Formatting::Pretty => Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
    };

    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
    }

    write_element(&mut writer, root, pretty)?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
    pretty: bool,
) -> Result<(), WriteError> {
    check_name(&element.name)?;
    if pretty && element.has_elements() && element.has_text() {
        return Err(WriteError::MixedContent(element.name.clone()));
    }

    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        check_name(&attr.name)?;
        check_chars(&attr.value, &element.name)?;
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &element.children {
        match child {
            Content::Element(e) => write_element(writer, e, pretty)?,
            Content::Text(text) => {
                check_chars(text, &element.name)?;
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(xml_error)?;
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}

fn check_name(name: &str) -> Result<(), WriteError> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(WriteError::InvalidName(name.to_string()))
    }
}

fn check_chars(text: &str, context: &str) -> Result<(), WriteError> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(ch) => Err(WriteError::InvalidChar {
            ch,
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

fn xml_error(e: impl std::fmt::Display) -> WriteError {
    WriteError::Io(std::io::Error::other(format!("XML write error: {e}")))
}
