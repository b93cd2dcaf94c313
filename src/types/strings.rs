//! Sized string wrapper types.
//!
//! `String32`, `String64`, and `String256` carry the same payload as a plain
//! `String` but are distinct wire types with a documented maximum length;
//! wrapping them keeps that distinction visible in the type system instead
//! of relying on an out-of-band tag.

use std::fmt;

macro_rules! sized_string {
    ($name:ident, $max:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(pub String);

        impl $name {
            /// Maximum length in bytes (including the mandatory trailing NUL).
            pub const MAX_LEN: usize = $max;

            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

sized_string!(String32, 32);
sized_string!(String64, 64);
sized_string!(String256, 256);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_len_constants() {
        assert_eq!(String32::MAX_LEN, 32);
        assert_eq!(String64::MAX_LEN, 64);
        assert_eq!(String256::MAX_LEN, 256);
    }

    #[test]
    fn test_display() {
        let s = String32::new("Hello");
        assert_eq!(format!("{}", s), "Hello");
    }

    #[test]
    fn test_from_string() {
        let s: String32 = String::from("abc").into();
        assert_eq!(s.as_str(), "abc");
    }
}
