//! xmlbind-core: Markup tree and type bindings.
//!
//! This crate provides the pieces shared by the xmlbind reader, writer and
//! codec: a small element tree, statically declared schemas, validated
//! bindings, and the traits that move typed values in and out of the tree.

mod binding;
mod cache;
mod error;
mod field;
mod markup;
mod options;
mod schema;
mod traits;
mod value;

pub mod nested;

pub use binding::*;
pub use cache::*;
pub use error::*;
pub use field::*;
pub use markup::*;
pub use options::*;
pub use schema::*;
pub use traits::*;
pub use value::*;
