//! [`Item`](crate::Item) behavior for bound types used as fields of other bound types.
//!
//! `#[derive(Bind)]` forwards to these functions; hand-written bindings can too.

use crate::{Bind, BindError, BindingCache, Element, FieldSchema, Source, from_element, to_element};

/// Append `value` as a child element named after the field.
pub fn write_item<T: Bind>(
    value: &T,
    field: &FieldSchema,
    parent: &mut Element,
    bindings: &BindingCache,
) -> Result<(), BindError> {
    let child = to_element(value, field.markup, bindings)?;
    parent.push_child(child);
    Ok(())
}

/// Read a nested value from the child element where the field was found.
pub fn read_item<T: Bind>(
    field: &FieldSchema,
    parent: &Element,
    source: Source<'_>,
    bindings: &BindingCache,
) -> Result<T, BindError> {
    match source {
        Source::Element(element) => from_element(element, bindings),
        Source::Attribute(_) | Source::Text(_) => Err(BindError::Placement {
            path: field.path(&parent.name),
        }),
    }
}

/// An absent nested value reads as if its element were present and empty.
pub fn absent<T: Bind>(field: &FieldSchema, bindings: &BindingCache) -> Result<T, BindError> {
    from_element(&Element::new(field.markup), bindings)
}
