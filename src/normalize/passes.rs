//! The canonical normalization passes

use super::Pass;
use super::keys;
use crate::error::AsconfigError;
use crate::model::{Scalar, Section, TYPE_KEY, Value};
use core::cmp::Ordering;

/// Promote a bare typed-context token to `{ type: token }`
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedContextPromotion;

impl Pass for TypedContextPromotion {
    fn name(&self) -> &'static str {
        "typed-context-promotion"
    }

    fn apply(
        &self,
        key: String,
        value: Value,
        _parent: &Section,
    ) -> Result<(String, Value), AsconfigError> {
        if !keys::is_typed_context(&key) {
            return Ok((key, value));
        }
        match value {
            Value::Scalar(scalar) => Ok((key, Section::new().with(TYPE_KEY, scalar).into())),
            other => Ok((key, other)),
        }
    }
}

/// Rename singular list keys to their plural form
///
/// Dual-cardinality keys holding a one-element list collapse to that
/// element and keep their singular key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralRewrite;

impl Pass for PluralRewrite {
    fn name(&self) -> &'static str {
        "plural-rewrite"
    }

    fn apply(
        &self,
        key: String,
        value: Value,
        _parent: &Section,
    ) -> Result<(String, Value), AsconfigError> {
        let Some(plural) = keys::plural_of(&key) else {
            return Ok((key, value));
        };

        if keys::is_dual_cardinality(&key) {
            if let Value::Scalars(mut items) = value {
                if items.len() == 1 {
                    if let Some(only) = items.pop() {
                        return Ok((key, Value::Scalar(only)));
                    }
                }
                let renamed = if items.len() >= 2 { plural.to_owned() } else { key };
                return Ok((renamed, Value::Scalars(items)));
            }
            return Ok((key, value));
        }

        if plural != key && value.is_sequence() {
            return Ok((plural.to_owned(), value));
        }
        Ok((key, value))
    }
}

/// Stable sort of every list of sections by identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierSort;

impl Pass for IdentifierSort {
    fn name(&self) -> &'static str {
        "identifier-sort"
    }

    fn apply(
        &self,
        key: String,
        value: Value,
        _parent: &Section,
    ) -> Result<(String, Value), AsconfigError> {
        match value {
            Value::Sections(mut sections) => {
                sort_by_identifier(&mut sections);
                if let Some(duplicate) = find_duplicate_identifier(&sections) {
                    return Err(AsconfigError::normalization(format!(
                        "identifier '{duplicate}' appears more than once in '{key}'"
                    )));
                }
                Ok((key, Value::Sections(sections)))
            }
            other => Ok((key, other)),
        }
    }
}

/// Stable sort by `name`, then `type`; sections without either sort last
#[inline]
pub fn sort_by_identifier(sections: &mut [Section]) {
    sections.sort_by(|left, right| compare_identifiers(left.identifier(), right.identifier()));
}

fn compare_identifiers(left: Option<&Scalar>, right: Option<&Scalar>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.to_string().cmp(&right.to_string()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Adjacent equal identifiers in an already sorted list
fn find_duplicate_identifier(sections: &[Section]) -> Option<String> {
    sections.windows(2).find_map(|pair| {
        let left = pair[0].identifier()?.to_string();
        let right = pair[1].identifier()?.to_string();
        (left == right).then_some(left)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Section {
        Section::new().with("name", name)
    }

    #[test]
    fn unnamed_sections_sort_last_and_keep_order() {
        let mut sections = vec![
            Section::new().with("x", 1_i64),
            named("b"),
            Section::new().with("x", 2_i64),
            Section::new().with("type", "a"),
        ];
        sort_by_identifier(&mut sections);
        assert_eq!(sections[0], Section::new().with("type", "a"));
        assert_eq!(sections[1], named("b"));
        assert_eq!(sections[2], Section::new().with("x", 1_i64));
        assert_eq!(sections[3], Section::new().with("x", 2_i64));
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let value = Value::Sections(vec![named("ns1"), named("ns1")]);
        let result = IdentifierSort.apply("namespaces".to_owned(), value, &Section::new());
        assert!(matches!(result, Err(AsconfigError::Normalization { .. })));
    }

    #[test]
    fn dual_cardinality_list_of_two_is_renamed() {
        let value = Value::Scalars(vec![Scalar::from("a"), Scalar::from("b")]);
        let (key, _) = PluralRewrite
            .apply("feature-key-file".to_owned(), value, &Section::new())
            .unwrap();
        assert_eq!(key, "feature-key-files");
    }
}
