//! Output options.

use std::fmt;
use std::str::FromStr;

/// Whitespace layout of emitted documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Formatting {
    /// No inserted whitespace.
    #[default]
    Compact,
    /// Indented, one element per line.
    Pretty,
}

impl Formatting {
    /// Interpret a string-typed "pretty print" flag.
    ///
    /// Only `true` (any ASCII case) selects [`Formatting::Pretty`]; every other
    /// value, malformed ones included, selects [`Formatting::Compact`].
    pub fn from_flag(flag: &str) -> Self {
        if flag.eq_ignore_ascii_case("true") {
            Formatting::Pretty
        } else {
            Formatting::Compact
        }
    }

    pub fn is_pretty(self) -> bool {
        self == Formatting::Pretty
    }
}

impl fmt::Display for Formatting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatting::Compact => f.write_str("compact"),
            Formatting::Pretty => f.write_str("pretty"),
        }
    }
}

/// Unrecognized formatting name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown formatting `{0}`, expected `compact` or `pretty`")]
pub struct UnknownFormatting(pub String);

impl FromStr for Formatting {
    type Err = UnknownFormatting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Formatting::Compact),
            "pretty" => Ok(Formatting::Pretty),
            _ => Err(UnknownFormatting(s.to_string())),
        }
    }
}

/// Options for emitting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmitOptions {
    /// Compact or pretty output.
    pub format: Formatting,
    /// Start the document with an XML declaration.
    pub declaration: bool,
}

impl EmitOptions {
    pub fn new(format: Formatting) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Leave out the XML declaration.
    pub fn without_declaration(mut self) -> Self {
        self.declaration = false;
        self
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            format: Formatting::Compact,
            declaration: true,
        }
    }
}
