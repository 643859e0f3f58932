//! xmlbind - type-directed XML document codec
//!
//! Converts typed values to XML documents and back without per-type
//! encoding code. A type declares its markup binding once, usually with
//! `#[derive(Bind)]`, and a [`Codec`] drives a generic reader and writer
//! with it.
//!
//! # Quick Start
//!
//! ```rust
//! use xmlbind::{Bind, Codec};
//!
//! #[derive(Bind, Debug, Default, PartialEq)]
//! #[xml(root = "node")]
//! struct NodeSpec {
//!     #[xml(attribute)]
//!     tag: String,
//!     #[xml(attribute)]
//!     count: Option<u32>,
//!     os: String,
//!     #[xml(rename = "openport")]
//!     open_ports: Vec<u16>,
//! }
//!
//! let codec = Codec::pretty();
//! let node = NodeSpec {
//!     tag: "web".into(),
//!     count: Some(2),
//!     os: "ubuntu".into(),
//!     open_ports: vec![22, 80],
//! };
//!
//! let xml = codec.encode(&node).unwrap();
//! assert!(xml.contains("\n  <openport>80</openport>\n"));
//!
//! let back: NodeSpec = codec.decode(&xml).unwrap();
//! assert_eq!(back, node);
//! ```
//!
//! # Architecture
//!
//! - `xmlbind-core`: markup tree, schemas, bindings and the binding cache
//! - `xmlbind-derive`: `#[derive(Bind)]`
//! - `xmlbind-read-xml`: text to markup tree
//! - `xmlbind-write-xml`: markup tree to text
//!
//! Decoding is lenient: unknown attributes and elements are skipped and
//! absent fields take their empty value.

extern crate self as xmlbind;

mod codec;
mod error;

pub use codec::*;
pub use error::*;

// Re-export core types
pub use xmlbind_core::*;
pub use xmlbind_core::scalar_field;
pub use xmlbind_derive::Bind;

/// Lower-level XML reading and writing.
pub mod xml {
    pub use xmlbind_read_xml::{BOM, ReadError, parse, strip_bom};
    pub use xmlbind_write_xml::{WriteError, emit, emit_with_options};
}

/// Common imports.
pub mod prelude {
    pub use crate::{Bind, Codec, CodecError, EmitOptions, Formatting};
}
