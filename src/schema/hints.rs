//! Scalar type hints derived from a JSON Schema
//!
//! The block format and the info snapshot carry untyped tokens. Hints let a
//! reader decide whether `true` is a boolean, whether `007` must stay a
//! string, and whether `4G` should be expanded to an integer.

use crate::model::Scalar;
use crate::normalize::keys;
use regex::Regex;
use serde_json::Value as Json;
use std::sync::LazyLock;

static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)([KkMmGgTtPp])$").expect("valid size pattern"));

static TIME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)([sShHdD])$").expect("valid time pattern"));

/// Declared JSON Schema type of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScalarType {
    Boolean,
    Integer,
    Number,
    String,
}

impl ScalarType {
    fn from_schema(node: &Json) -> Option<Self> {
        match node.get("type")?.as_str()? {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

/// Type a raw token, honouring an optional schema hint
#[must_use]
#[inline]
pub fn type_token(token: &str, hint: Option<ScalarType>) -> Scalar {
    match hint {
        Some(ScalarType::String) => Scalar::Str(token.to_owned()),
        Some(ScalarType::Boolean) if token.eq_ignore_ascii_case("true") => Scalar::Bool(true),
        Some(ScalarType::Boolean) if token.eq_ignore_ascii_case("false") => Scalar::Bool(false),
        Some(ScalarType::Integer) => match Scalar::from_token(token) {
            Scalar::Str(_) => expand_suffix(token).map_or_else(|| Scalar::from(token), Scalar::Int),
            other => other,
        },
        Some(ScalarType::Boolean | ScalarType::Number) | None => Scalar::from_token(token),
    }
}

/// Expand `4G`-style sizes (1024-based) and `2h`-style durations (seconds)
fn expand_suffix(token: &str) -> Option<i64> {
    if let Some(captures) = SIZE_SUFFIX.captures(token) {
        let base: i64 = captures[1].parse().ok()?;
        let shift = match captures[2].to_ascii_uppercase().as_str() {
            "K" => 10,
            "M" => 20,
            "G" => 30,
            "T" => 40,
            _ => 50,
        };
        return base.checked_mul(1_i64 << shift);
    }
    if let Some(captures) = TIME_SUFFIX.captures(token) {
        let base: i64 = captures[1].parse().ok()?;
        let factor = match captures[2].to_ascii_lowercase().as_str() {
            "s" => 1,
            "h" => 3600,
            _ => 86_400,
        };
        return base.checked_mul(factor);
    }
    None
}

/// Schema-backed lookup of leaf types along a document path
#[derive(Debug, Clone)]
pub struct TypeHints {
    schema: Json,
}

impl TypeHints {
    /// Build hints from a parsed JSON Schema
    #[must_use]
    #[inline]
    pub const fn new(schema: Json) -> Self {
        Self { schema }
    }

    /// Schema node of the document root
    #[must_use]
    #[inline]
    pub const fn root(&self) -> &Json {
        &self.schema
    }

    /// Schema node of the section opened by `key` (with optional identifier) under `parent`
    ///
    /// Lists resolve to their `items` schema, and typed contexts resolve to
    /// the `oneOf` alternative whose `type` property accepts the identifier.
    #[must_use]
    #[inline]
    pub fn section<'s>(
        &self,
        parent: &'s Json,
        key: &str,
        identifier: Option<&str>,
    ) -> Option<&'s Json> {
        let node = unwrap_items(property(parent, key)?);
        let Some(alternatives) = node.get("oneOf").and_then(Json::as_array) else {
            return Some(node);
        };
        let identifier = identifier?;
        alternatives
            .iter()
            .find(|alternative| accepts_type(alternative, identifier))
    }

    /// Declared type of the leaf `key` under `parent`
    #[must_use]
    #[inline]
    pub fn scalar(&self, parent: Option<&Json>, key: &str) -> Option<ScalarType> {
        let node = unwrap_items(property(parent?, key)?);
        ScalarType::from_schema(node)
    }
}

/// Child schema of `key`, trying the plural spelling first
fn property<'s>(parent: &'s Json, key: &str) -> Option<&'s Json> {
    let properties = parent.get("properties")?;
    keys::plural_of(key)
        .and_then(|plural| properties.get(plural))
        .or_else(|| properties.get(key))
}

fn unwrap_items(node: &Json) -> &Json {
    node.get("items").unwrap_or(node)
}

fn accepts_type(alternative: &Json, identifier: &str) -> bool {
    let Some(type_schema) = alternative
        .get("properties")
        .and_then(|properties| properties.get("type"))
    else {
        return false;
    };
    if type_schema.get("const").and_then(Json::as_str) == Some(identifier) {
        return true;
    }
    type_schema
        .get("enum")
        .and_then(Json::as_array)
        .is_some_and(|values| values.iter().any(|value| value.as_str() == Some(identifier)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_size_and_time_suffixes() {
        assert_eq!(type_token("4G", Some(ScalarType::Integer)), Scalar::Int(4 << 30));
        assert_eq!(type_token("128m", Some(ScalarType::Integer)), Scalar::Int(128 << 20));
        assert_eq!(type_token("2h", Some(ScalarType::Integer)), Scalar::Int(7200));
        assert_eq!(type_token("4G", None), Scalar::from("4G"));
    }

    #[test]
    fn booleans_only_where_declared() {
        assert_eq!(type_token("true", Some(ScalarType::Boolean)), Scalar::Bool(true));
        assert_eq!(type_token("true", Some(ScalarType::String)), Scalar::from("true"));
        assert_eq!(type_token("true", None), Scalar::from("true"));
        assert_eq!(type_token("007", Some(ScalarType::String)), Scalar::from("007"));
    }

    #[test]
    fn resolves_typed_context_alternative() {
        let hints = TypeHints::new(json!({
            "properties": {
                "namespaces": {
                    "type": "array",
                    "items": {
                        "properties": {
                            "storage-engine": {
                                "oneOf": [
                                    {"properties": {"type": {"enum": ["memory"]}}},
                                    {"properties": {
                                        "type": {"enum": ["device"]},
                                        "data-in-memory": {"type": "boolean"}
                                    }}
                                ]
                            }
                        }
                    }
                }
            }
        }));
        let namespace = hints.section(hints.root(), "namespace", Some("test"));
        let engine = namespace.and_then(|ns| hints.section(ns, "storage-engine", Some("device")));
        assert_eq!(hints.scalar(engine, "data-in-memory"), Some(ScalarType::Boolean));
    }
}
