//! The document codec.

use std::borrow::Borrow;
use std::sync::Arc;

use tracing::debug;
use xmlbind_core::{
    Bind, BindError, Binding, BindingCache, Element, EmitOptions, Formatting, from_document,
    to_document,
};
use xmlbind_read_xml::{ReadError, parse, strip_bom};
use xmlbind_write_xml::emit_with_options;

use crate::{Cause, CodecError};

/// Conventional configuration key for the pretty-print flag.
pub const PRETTY_PRINT_PROPERTY: &str = "xmlbind.pretty-print";

/// Encodes typed values as XML documents and decodes them back.
///
/// Output formatting is fixed at construction. Bindings are resolved on first
/// use of each type and shared by every later call, from any thread.
///
/// ```
/// use xmlbind::{Bind, Codec};
///
/// #[derive(Bind, Debug, PartialEq)]
/// struct Node {
///     #[xml(attribute)]
///     tag: String,
///     size: Option<String>,
/// }
///
/// let codec = Codec::compact();
/// let node = Node { tag: "web".into(), size: Some("small".into()) };
/// let xml = codec.encode(&node).unwrap();
/// assert!(xml.ends_with(r#"<node tag="web"><size>small</size></node>"#));
/// assert_eq!(codec.decode::<Node>(&xml).unwrap(), node);
/// ```
#[derive(Debug, Default)]
pub struct Codec {
    options: EmitOptions,
    bindings: BindingCache,
}

impl Codec {
    pub fn new(format: Formatting) -> Self {
        Self::with_options(EmitOptions::new(format))
    }

    pub fn with_options(options: EmitOptions) -> Self {
        Self {
            options,
            bindings: BindingCache::new(),
        }
    }

    pub fn compact() -> Self {
        Self::new(Formatting::Compact)
    }

    pub fn pretty() -> Self {
        Self::new(Formatting::Pretty)
    }

    /// Build from a string-typed pretty-print setting.
    ///
    /// See [`Formatting::from_flag`]: unrecognized values select compact output.
    pub fn from_pretty_print_flag(flag: &str) -> Self {
        Self::new(Formatting::from_flag(flag))
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    pub fn formatting(&self) -> Formatting {
        self.options.format
    }

    /// Bindings resolved so far.
    pub fn bindings(&self) -> &BindingCache {
        &self.bindings
    }

    /// Resolve the binding of `T`.
    pub fn binding<T: Bind>(&self) -> Result<Arc<Binding>, BindError> {
        Ok(self.bindings.resolve::<T>()?)
    }

    /// Encode a value using the binding of its own type.
    pub fn encode<T: Bind>(&self, value: &T) -> Result<String, CodecError> {
        self.write_document(value)
            .map_err(|cause| CodecError::encoding(std::any::type_name::<T>(), cause))
    }

    /// Encode a value using the binding of `D`.
    pub fn encode_as<D: Bind>(&self, value: &impl Borrow<D>) -> Result<String, CodecError> {
        self.encode::<D>(value.borrow())
    }

    /// Decode a document into a value of type `T`.
    pub fn decode<T: Bind>(&self, text: &str) -> Result<T, CodecError> {
        self.read_document(text)
            .map_err(|cause| CodecError::decoding(std::any::type_name::<T>(), text, cause))
    }

    fn write_document<T: Bind>(&self, value: &T) -> Result<String, Cause> {
        let root = to_document(value, &self.bindings)?;
        Ok(emit_with_options(&root, &self.options)?)
    }

    fn read_document<T: Bind>(&self, text: &str) -> Result<T, Cause> {
        let binding = self.binding::<T>()?;
        let root = read_root(&binding, text)?;
        Ok(from_document(&root, &self.bindings)?)
    }
}

/// Parse the document, reading an empty one as an empty root element when
/// the binding has no required fields.
///
/// Whitespace-only text next to child elements is indentation here: bound
/// types never mix text fields with element fields.
fn read_root(binding: &Binding, text: &str) -> Result<Element, ReadError> {
    let body = strip_bom(text);
    if !body.trim().is_empty() {
        let mut root = parse(body)?;
        root.strip_indentation();
        return Ok(root);
    }
    if binding.permits_empty() {
        debug!(
            type_name = binding.type_name(),
            "decoding empty document as an empty root element"
        );
        Ok(Element::new(binding.root()))
    } else {
        Err(ReadError::Empty)
    }
}
