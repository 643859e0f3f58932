//! Field values: what a bound struct field may hold.

use tracing::debug;

use crate::{BindError, BindingCache, Element, FieldSchema, Kind, Occurs, Placement, ScalarValue};

/// Where a single field occurrence was found in the parent element.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Attribute(&'a str),
    Text(&'a Element),
    Element(&'a Element),
}

/// One occurrence of a field value: a scalar or a nested bound type.
pub trait Item: Sized {
    const KIND: Kind;

    /// Add this value to `parent` as the given field.
    fn write_item(
        &self,
        field: &FieldSchema,
        parent: &mut Element,
        bindings: &BindingCache,
    ) -> Result<(), BindError>;

    /// Read this value from where the field was found under `parent`.
    fn read_item(
        field: &FieldSchema,
        parent: &Element,
        source: Source<'_>,
        bindings: &BindingCache,
    ) -> Result<Self, BindError>;

    /// The value of an absent field.
    fn absent(field: &FieldSchema, bindings: &BindingCache) -> Result<Self, BindError>;
}

/// A value a bound struct field may hold: an [`Item`], `Option<Item>` or `Vec<Item>`.
pub trait FieldValue: Sized {
    const KIND: Kind;
    const OCCURS: Occurs;

    fn write_field(
        &self,
        field: &FieldSchema,
        parent: &mut Element,
        bindings: &BindingCache,
    ) -> Result<(), BindError>;

    fn read_field(
        field: &FieldSchema,
        parent: &Element,
        bindings: &BindingCache,
    ) -> Result<Self, BindError>;
}

/// Find the single occurrence of `field` under `parent`.
pub fn locate<'a>(field: &FieldSchema, parent: &'a Element) -> Option<Source<'a>> {
    match field.placement {
        Placement::Attribute => parent.attribute(field.markup).map(Source::Attribute),
        Placement::Element => parent.first_element(field.markup).map(Source::Element),
        Placement::Text => parent.has_text().then_some(Source::Text(parent)),
    }
}

/// Read a field that occurs exactly once, defaulting when it is absent.
pub fn read_one<T: Item>(
    field: &FieldSchema,
    parent: &Element,
    bindings: &BindingCache,
) -> Result<T, BindError> {
    match locate(field, parent) {
        Some(source) => T::read_item(field, parent, source, bindings),
        None => {
            if field.required {
                debug!(
                    path = %field.path(&parent.name),
                    "required field missing, using its empty value"
                );
            }
            T::absent(field, bindings)
        }
    }
}

/// Write a scalar at the field's placement.
pub fn write_scalar<T: ScalarValue>(
    value: &T,
    field: &FieldSchema,
    parent: &mut Element,
) -> Result<(), BindError> {
    let text = value.to_markup().map_err(|source| BindError::Value {
        path: field.path(&parent.name),
        source,
    })?;
    match field.placement {
        Placement::Attribute => parent.set_attribute(field.markup, text),
        Placement::Element => parent.push_child(Element::new(field.markup).text(text)),
        Placement::Text => parent.push_text(text),
    }
    Ok(())
}

/// Read a scalar from wherever the field was found.
pub fn read_scalar<T: ScalarValue>(
    field: &FieldSchema,
    parent: &Element,
    source: Source<'_>,
) -> Result<T, BindError> {
    let parsed = match source {
        Source::Attribute(value) => T::from_markup(value),
        Source::Text(element) | Source::Element(element) => T::from_markup(&element.text_content()),
    };
    parsed.map_err(|err| BindError::Value {
        path: field.path(&parent.name),
        source: err,
    })
}

/// Implement [`Item`] and [`FieldValue`] for types that implement [`ScalarValue`].
///
/// ```ignore
/// impl ScalarValue for Port { /* ... */ }
/// xmlbind_core::scalar_field!(Port);
/// ```
#[macro_export]
macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Item for $ty {
                const KIND: $crate::Kind = $crate::Kind::Scalar;

                fn write_item(
                    &self,
                    field: &$crate::FieldSchema,
                    parent: &mut $crate::Element,
                    _bindings: &$crate::BindingCache,
                ) -> ::core::result::Result<(), $crate::BindError> {
                    $crate::write_scalar(self, field, parent)
                }

                fn read_item(
                    field: &$crate::FieldSchema,
                    parent: &$crate::Element,
                    source: $crate::Source<'_>,
                    _bindings: &$crate::BindingCache,
                ) -> ::core::result::Result<Self, $crate::BindError> {
                    $crate::read_scalar(field, parent, source)
                }

                fn absent(
                    _field: &$crate::FieldSchema,
                    _bindings: &$crate::BindingCache,
                ) -> ::core::result::Result<Self, $crate::BindError> {
                    ::core::result::Result::Ok(<Self as ::core::default::Default>::default())
                }
            }

            impl $crate::FieldValue for $ty {
                const KIND: $crate::Kind = $crate::Kind::Scalar;
                const OCCURS: $crate::Occurs = $crate::Occurs::One;

                fn write_field(
                    &self,
                    field: &$crate::FieldSchema,
                    parent: &mut $crate::Element,
                    bindings: &$crate::BindingCache,
                ) -> ::core::result::Result<(), $crate::BindError> {
                    $crate::Item::write_item(self, field, parent, bindings)
                }

                fn read_field(
                    field: &$crate::FieldSchema,
                    parent: &$crate::Element,
                    bindings: &$crate::BindingCache,
                ) -> ::core::result::Result<Self, $crate::BindError> {
                    $crate::read_one(field, parent, bindings)
                }
            }
        )*
    };
}

scalar_field!(
    String,
    char,
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    std::path::PathBuf,
);

impl<T: Item> FieldValue for Option<T> {
    const KIND: Kind = T::KIND;
    const OCCURS: Occurs = Occurs::Optional;

    fn write_field(
        &self,
        field: &FieldSchema,
        parent: &mut Element,
        bindings: &BindingCache,
    ) -> Result<(), BindError> {
        match self {
            Some(value) => value.write_item(field, parent, bindings),
            None => Ok(()),
        }
    }

    fn read_field(
        field: &FieldSchema,
        parent: &Element,
        bindings: &BindingCache,
    ) -> Result<Self, BindError> {
        locate(field, parent)
            .map(|source| T::read_item(field, parent, source, bindings))
            .transpose()
    }
}

impl<T: Item> FieldValue for Vec<T> {
    const KIND: Kind = T::KIND;
    const OCCURS: Occurs = Occurs::Many;

    fn write_field(
        &self,
        field: &FieldSchema,
        parent: &mut Element,
        bindings: &BindingCache,
    ) -> Result<(), BindError> {
        for value in self {
            value.write_item(field, parent, bindings)?;
        }
        Ok(())
    }

    fn read_field(
        field: &FieldSchema,
        parent: &Element,
        bindings: &BindingCache,
    ) -> Result<Self, BindError> {
        parent
            .elements_named(field.markup)
            .map(|element| T::read_item(field, parent, Source::Element(element), bindings))
            .collect()
    }
}
