//! Binding and traversal errors.

/// A schema that cannot be turned into a binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("type `{type_name}` declares no fields to bind")]
    NoFields { type_name: &'static str },
    #[error("type `{type_name}` uses invalid markup name `{name}`")]
    InvalidName {
        type_name: &'static str,
        name: &'static str,
    },
    #[error("type `{type_name}` binds `{name}` more than once")]
    DuplicateName {
        type_name: &'static str,
        name: &'static str,
    },
    #[error("type `{type_name}` binds more than one text field")]
    MultipleText { type_name: &'static str },
    #[error("type `{type_name}` mixes a text field with element fields")]
    MixedContent { type_name: &'static str },
    #[error("field `{field}` of `{type_name}` must be bound to an element")]
    RequiresElement {
        type_name: &'static str,
        field: &'static str,
    },
    #[error("text field `{field}` of `{type_name}` cannot be optional")]
    OptionalText {
        type_name: &'static str,
        field: &'static str,
    },
}

/// A scalar that cannot be converted to or from markup text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert `{value}` as {expected}")]
pub struct ValueError {
    /// Description of the expected type, e.g. "an unsigned 32-bit integer".
    pub expected: &'static str,
    pub value: String,
}

impl ValueError {
    pub fn new(expected: &'static str, value: impl Into<String>) -> Self {
        Self {
            expected,
            value: value.into(),
        }
    }
}

/// Error while moving a value into or out of the markup tree.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("expected root element `{expected}`, found `{found}`")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
    #[error("type `{type_name}` has no bound field `{field}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
    #[error("`{path}` holds a nested value and must be an element")]
    Placement { path: String },
    #[error("invalid value at `{path}`: {source}")]
    Value {
        path: String,
        #[source]
        source: ValueError,
    },
    #[error("{0}")]
    Custom(String),
}

impl BindError {
    /// Create a free-form error from a hand-written binding.
    pub fn custom(message: impl Into<String>) -> Self {
        BindError::Custom(message.into())
    }
}
