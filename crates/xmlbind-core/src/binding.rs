//! Validated bindings built from schemas.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::{BindError, BindingError, FieldSchema, Kind, Occurs, Placement, Schema, is_xml_name};

/// A validated, immutable mapping from a type to markup structure.
#[derive(Debug, Clone)]
pub struct Binding {
    schema: Schema,
    by_field: HashMap<&'static str, usize>,
}

impl Binding {
    /// Validate a schema and index its fields.
    pub fn new(schema: Schema) -> Result<Self, BindingError> {
        let type_name = schema.type_name;

        if !is_xml_name(schema.root) {
            return Err(BindingError::InvalidName {
                type_name,
                name: schema.root,
            });
        }
        if schema.fields.is_empty() {
            return Err(BindingError::NoFields { type_name });
        }

        let mut by_field = HashMap::with_capacity(schema.fields.len());
        let mut attributes = HashSet::new();
        let mut elements = HashSet::new();
        let mut text_fields = 0;

        for (index, field) in schema.fields.iter().enumerate() {
            if by_field.insert(field.field, index).is_some() {
                return Err(BindingError::DuplicateName {
                    type_name,
                    name: field.field,
                });
            }

            let needs_element = field.kind == Kind::Nested || field.occurs == Occurs::Many;
            if needs_element && field.placement != Placement::Element {
                return Err(BindingError::RequiresElement {
                    type_name,
                    field: field.field,
                });
            }

            // An empty text and no text read back the same.
            if field.placement == Placement::Text && field.occurs == Occurs::Optional {
                return Err(BindingError::OptionalText {
                    type_name,
                    field: field.field,
                });
            }

            match field.placement {
                Placement::Text => text_fields += 1,
                Placement::Attribute => {
                    check_name(type_name, field)?;
                    // Namespace declarations are stripped by the reader.
                    if field.markup.starts_with("xmlns") {
                        return Err(BindingError::InvalidName {
                            type_name,
                            name: field.markup,
                        });
                    }
                    if !attributes.insert(field.markup) {
                        return Err(BindingError::DuplicateName {
                            type_name,
                            name: field.markup,
                        });
                    }
                }
                Placement::Element => {
                    check_name(type_name, field)?;
                    if !elements.insert(field.markup) {
                        return Err(BindingError::DuplicateName {
                            type_name,
                            name: field.markup,
                        });
                    }
                }
            }
        }

        if text_fields > 1 {
            return Err(BindingError::MultipleText { type_name });
        }
        if text_fields == 1 && !elements.is_empty() {
            return Err(BindingError::MixedContent { type_name });
        }

        Ok(Self { schema, by_field })
    }

    /// Rust type name of the bound type.
    pub fn type_name(&self) -> &'static str {
        self.schema.type_name
    }

    /// Root element name.
    pub fn root(&self) -> &'static str {
        self.schema.root
    }

    /// Default namespace, if declared.
    pub fn namespace(&self) -> Option<&'static str> {
        self.schema.namespace
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.schema.fields
    }

    /// The schema this binding was built from.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Look up a field by its Rust identifier.
    pub fn field(&self, field: &str) -> Result<&FieldSchema, BindError> {
        self.by_field
            .get(field)
            .map(|&i| &self.schema.fields[i])
            .ok_or_else(|| BindError::UnknownField {
                type_name: self.schema.type_name,
                field: field.to_string(),
            })
    }

    /// Whether an attribute with this name is bound.
    pub fn binds_attribute(&self, name: &str) -> bool {
        self.schema
            .fields
            .iter()
            .any(|f| f.placement == Placement::Attribute && f.markup == name)
    }

    /// Whether a child element with this name is bound.
    pub fn binds_element(&self, name: &str) -> bool {
        self.schema
            .fields
            .iter()
            .any(|f| f.placement == Placement::Element && f.markup == name)
    }

    /// Whether text content is bound.
    pub fn binds_text(&self) -> bool {
        self.schema
            .fields
            .iter()
            .any(|f| f.placement == Placement::Text)
    }

    /// Whether an empty document can stand for a value of this type.
    pub fn permits_empty(&self) -> bool {
        self.schema.fields.iter().all(|f| !f.required)
    }
}

fn check_name(type_name: &'static str, field: &FieldSchema) -> Result<(), BindingError> {
    if is_xml_name(field.markup) {
        Ok(())
    } else {
        Err(BindingError::InvalidName {
            type_name,
            name: field.markup,
        })
    }
}
