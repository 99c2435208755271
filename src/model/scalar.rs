//! Leaf values of a configuration document

use core::fmt;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer pattern"));

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+(?:\.[0-9]*)?[eE][+-]?[0-9]+)$")
        .expect("valid float pattern")
});

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Classify a bare token as the narrowest of integer, double or string.
    ///
    /// Booleans are never inferred here: `true` stays a string unless a
    /// caller knows the position is boolean.
    #[must_use]
    #[inline]
    pub fn from_token(token: &str) -> Self {
        if INTEGER.is_match(token) {
            if let Ok(value) = token.parse::<i64>() {
                return Self::Int(value);
            }
            if let Ok(value) = token.parse::<u64>() {
                return Self::UInt(value);
            }
        }
        if FLOAT.is_match(token) {
            if let Ok(value) = token.parse::<f64>() {
                return Self::Float(value);
            }
        }
        Self::Str(token.to_owned())
    }

    /// Borrow the string payload, if this is a string scalar
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Compare two scalars, treating strings case-insensitively
    #[must_use]
    #[inline]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(left), Self::Str(right)) => left.eq_ignore_ascii_case(right),
            _ => self == other,
        }
    }

    /// Short name of the scalar kind, used in diagnostics
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "number",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            // Debug keeps the fractional part of integral floats (`1.0`)
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UInt(value), Self::Int)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tokens() {
        assert_eq!(Scalar::from_token("3000"), Scalar::Int(3000));
        assert_eq!(Scalar::from_token("-12"), Scalar::Int(-12));
        assert_eq!(Scalar::from_token("0.5"), Scalar::Float(0.5));
        assert_eq!(Scalar::from_token("1e3"), Scalar::Float(1000.0));
        assert_eq!(Scalar::from_token("10.0.0.1"), Scalar::from("10.0.0.1"));
        assert_eq!(Scalar::from_token("true"), Scalar::from("true"));
        assert_eq!(Scalar::from_token("inf"), Scalar::from("inf"));
        assert_eq!(Scalar::from_token("4G"), Scalar::from("4G"));
    }

    #[test]
    fn unsigned_integers_stay_exact() {
        assert_eq!(Scalar::from_token("18446744073709551615"), Scalar::UInt(u64::MAX));
        assert_eq!(Scalar::UInt(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Scalar::from(42_u64), Scalar::Int(42));
    }

    #[test]
    fn integer_overflow_stays_string() {
        let token = "99999999999999999999999";
        assert_eq!(Scalar::from_token(token), Scalar::from(token));
    }

    #[test]
    fn floats_keep_fraction_when_displayed() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(0.25).to_string(), "0.25");
    }
}
