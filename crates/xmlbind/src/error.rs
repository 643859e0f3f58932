//! Codec errors.

use xmlbind_core::BindError;
use xmlbind_read_xml::ReadError;
use xmlbind_write_xml::WriteError;

/// Longest excerpt of the input kept in a decoding error, in characters.
pub const EXCERPT_LIMIT: usize = 512;

/// The layer a codec operation failed in.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// Unbindable type, or the value did not fit its binding.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The text is not a well-formed document.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The markup tree could not be written as text.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Error from [`Codec`](crate::Codec) operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cannot encode `{type_name}`: {cause}")]
    Encoding {
        type_name: &'static str,
        #[source]
        cause: Cause,
    },
    #[error("cannot decode `{type_name}`: {cause} (input: {excerpt:?})")]
    Decoding {
        type_name: &'static str,
        excerpt: String,
        #[source]
        cause: Cause,
    },
}

impl CodecError {
    pub(crate) fn encoding(type_name: &'static str, cause: impl Into<Cause>) -> Self {
        CodecError::Encoding {
            type_name,
            cause: cause.into(),
        }
    }

    pub(crate) fn decoding(type_name: &'static str, input: &str, cause: impl Into<Cause>) -> Self {
        CodecError::Decoding {
            type_name,
            excerpt: excerpt(input),
            cause: cause.into(),
        }
    }

    /// Name of the type being encoded or decoded.
    pub fn type_name(&self) -> &'static str {
        match self {
            CodecError::Encoding { type_name, .. } | CodecError::Decoding { type_name, .. } => {
                type_name
            }
        }
    }

    /// Start of the text that failed to decode.
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            CodecError::Decoding { excerpt, .. } => Some(excerpt),
            CodecError::Encoding { .. } => None,
        }
    }

    pub fn cause(&self) -> &Cause {
        match self {
            CodecError::Encoding { cause, .. } | CodecError::Decoding { cause, .. } => cause,
        }
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, CodecError::Encoding { .. })
    }

    pub fn is_decoding(&self) -> bool {
        matches!(self, CodecError::Decoding { .. })
    }
}

/// The first [`EXCERPT_LIMIT`] characters of `input`, marked when cut.
pub(crate) fn excerpt(input: &str) -> String {
    match input.char_indices().nth(EXCERPT_LIMIT) {
        Some((end, _)) => format!("{}...", &input[..end]),
        None => input.to_string(),
    }
}
