//! Scalar conversions to and from markup text.

use std::path::PathBuf;

use crate::ValueError;

/// A primitive stored as attribute or element text.
///
/// `Default` supplies the value of an absent field.
pub trait ScalarValue: Sized + Default {
    /// Render the value as markup text.
    fn to_markup(&self) -> Result<String, ValueError>;

    /// Parse the value from markup text.
    fn from_markup(text: &str) -> Result<Self, ValueError>;
}

impl ScalarValue for String {
    fn to_markup(&self) -> Result<String, ValueError> {
        Ok(self.clone())
    }

    fn from_markup(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }
}

impl ScalarValue for char {
    fn to_markup(&self) -> Result<String, ValueError> {
        Ok(self.to_string())
    }

    fn from_markup(text: &str) -> Result<Self, ValueError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ValueError::new("a single character", text)),
        }
    }
}

impl ScalarValue for bool {
    fn to_markup(&self) -> Result<String, ValueError> {
        Ok(self.to_string())
    }

    fn from_markup(text: &str) -> Result<Self, ValueError> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ValueError::new("a boolean", text)),
        }
    }
}

impl ScalarValue for PathBuf {
    fn to_markup(&self) -> Result<String, ValueError> {
        self.to_str()
            .map(str::to_string)
            .ok_or_else(|| ValueError::new("a UTF-8 path", self.to_string_lossy()))
    }

    fn from_markup(text: &str) -> Result<Self, ValueError> {
        Ok(PathBuf::from(text))
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $expected:literal),* $(,)?) => {
        $(
            impl ScalarValue for $ty {
                fn to_markup(&self) -> Result<String, ValueError> {
                    Ok(self.to_string())
                }

                fn from_markup(text: &str) -> Result<Self, ValueError> {
                    text.trim()
                        .parse()
                        .map_err(|_| ValueError::new($expected, text))
                }
            }
        )*
    };
}

impl_integer! {
    i8 => "a signed 8-bit integer",
    i16 => "a signed 16-bit integer",
    i32 => "a signed 32-bit integer",
    i64 => "a signed 64-bit integer",
    i128 => "a signed 128-bit integer",
    isize => "a signed integer",
    u8 => "an unsigned 8-bit integer",
    u16 => "an unsigned 16-bit integer",
    u32 => "an unsigned 32-bit integer",
    u64 => "an unsigned 64-bit integer",
    u128 => "an unsigned 128-bit integer",
    usize => "an unsigned integer",
}

macro_rules! impl_float {
    ($($ty:ident => $expected:literal),* $(,)?) => {
        $(
            impl ScalarValue for $ty {
                fn to_markup(&self) -> Result<String, ValueError> {
                    Ok(if self.is_nan() {
                        "NaN".to_string()
                    } else if *self == $ty::INFINITY {
                        "INF".to_string()
                    } else if *self == $ty::NEG_INFINITY {
                        "-INF".to_string()
                    } else {
                        self.to_string()
                    })
                }

                fn from_markup(text: &str) -> Result<Self, ValueError> {
                    match text.trim() {
                        "INF" | "+INF" => Ok($ty::INFINITY),
                        "-INF" => Ok($ty::NEG_INFINITY),
                        other => other.parse().map_err(|_| ValueError::new($expected, text)),
                    }
                }
            }
        )*
    };
}

impl_float! {
    f32 => "a 32-bit float",
    f64 => "a 64-bit float",
}
