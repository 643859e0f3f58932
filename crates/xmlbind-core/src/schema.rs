//! Statically declared type schemas.

use crate::FieldValue;

/// Where a field lives in the markup of its parent element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// An attribute on the parent element.
    Attribute,
    /// A child element of the parent.
    Element,
    /// The text content of the parent element.
    Text,
}

/// What a single occurrence of a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A primitive converted to and from text.
    Scalar,
    /// A bound type with its own fields.
    Nested,
}

/// How many times a field may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurs {
    One,
    Optional,
    Many,
}

/// Declaration of one field of a bound type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Rust field identifier.
    pub field: &'static str,
    /// Attribute or element name in the markup (unused for text fields).
    pub markup: &'static str,
    pub placement: Placement,
    pub kind: Kind,
    pub occurs: Occurs,
    /// Recorded for documentation and empty-document handling; never enforced.
    pub required: bool,
}

impl FieldSchema {
    /// Declare a field whose kind and occurrence come from its Rust type.
    pub fn new<V: FieldValue>(field: &'static str, markup: &'static str, placement: Placement) -> Self {
        Self {
            field,
            markup,
            placement,
            kind: V::KIND,
            occurs: V::OCCURS,
            required: false,
        }
    }

    /// Declare an attribute field named after the Rust field.
    pub fn attribute<V: FieldValue>(field: &'static str) -> Self {
        Self::new::<V>(field, field, Placement::Attribute)
    }

    /// Declare a child element field named after the Rust field.
    pub fn element<V: FieldValue>(field: &'static str) -> Self {
        Self::new::<V>(field, field, Placement::Element)
    }

    /// Declare the text content field.
    pub fn text<V: FieldValue>(field: &'static str) -> Self {
        Self::new::<V>(field, field, Placement::Text)
    }

    /// Use a different markup name.
    pub fn rename(mut self, markup: &'static str) -> Self {
        self.markup = markup;
        self
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Human-readable location of this field under `parent`, e.g. `node@tag` or `node/size`.
    pub fn path(&self, parent: &str) -> String {
        match self.placement {
            Placement::Attribute => format!("{parent}@{}", self.markup),
            Placement::Element => format!("{parent}/{}", self.markup),
            Placement::Text => format!("{parent}/text()"),
        }
    }
}

/// Declaration of a bound type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Rust type name, used in diagnostics.
    pub type_name: &'static str,
    /// Element name used when the type is the document root.
    pub root: &'static str,
    /// Default namespace written on the root element.
    pub namespace: Option<&'static str>,
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    /// Create a schema with no fields.
    pub fn new(type_name: &'static str, root: &'static str) -> Self {
        Self {
            type_name,
            root,
            namespace: None,
            fields: Vec::new(),
        }
    }

    /// Set the default namespace.
    pub fn namespace(mut self, namespace: &'static str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Add a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_shape_from_type() {
        let one = FieldSchema::element::<String>("name");
        assert_eq!((one.kind, one.occurs), (Kind::Scalar, Occurs::One));

        let opt = FieldSchema::attribute::<Option<u32>>("count");
        assert_eq!((opt.kind, opt.occurs), (Kind::Scalar, Occurs::Optional));

        let many = FieldSchema::element::<Vec<bool>>("flag").rename("flags");
        assert_eq!((many.kind, many.occurs), (Kind::Scalar, Occurs::Many));
        assert_eq!(many.field, "flag");
        assert_eq!(many.markup, "flags");
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(FieldSchema::attribute::<String>("tag").path("node"), "node@tag");
        assert_eq!(FieldSchema::element::<String>("os").path("node"), "node/os");
        assert_eq!(FieldSchema::text::<String>("body").path("note"), "note/text()");
    }
}
