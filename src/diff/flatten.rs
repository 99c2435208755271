//! Dotted-path view of a document

use crate::model::{Scalar, Section, Value};
use std::collections::BTreeMap;

/// Trailing segment of the reserved keys recording list positions
pub const INDEX_SEGMENT: &str = "<index>";

/// Sorted mapping from dotted path to leaf value
pub type FlatMap = BTreeMap<String, Scalar>;

/// Whether a flattened key is internal metadata that is never compared
#[must_use]
#[inline]
pub fn is_reserved(key: &str) -> bool {
    key.rsplit('.').next() == Some(INDEX_SEGMENT)
}

/// Flatten a document into dotted paths
///
/// Elements of a list of sections are addressed by their identifier and
/// get a reserved `<path>.<index>` entry holding their position; elements of
/// a list of scalars are addressed by position.
#[must_use]
#[inline]
pub fn flatten(root: &Section) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_section(&mut out, "", root);
    out
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn flatten_section(out: &mut FlatMap, prefix: &str, section: &Section) {
    for (key, value) in section.iter() {
        flatten_value(out, &join(prefix, key), value);
    }
}

fn flatten_value(out: &mut FlatMap, path: &str, value: &Value) {
    match value {
        Value::Scalar(scalar) => {
            out.insert(path.to_owned(), scalar.clone());
        }
        Value::Scalars(items) => {
            for (index, item) in items.iter().enumerate() {
                out.insert(join(path, &index.to_string()), item.clone());
            }
        }
        Value::Section(section) => flatten_section(out, path, section),
        Value::Sections(sections) => {
            for (index, section) in sections.iter().enumerate() {
                let segment = section
                    .identifier()
                    .map_or_else(|| index.to_string(), ToString::to_string);
                let element = join(path, &segment);
                let position = i64::try_from(index).unwrap_or(i64::MAX);
                out.insert(join(&element, INDEX_SEGMENT), Scalar::Int(position));
                flatten_section(out, &element, section);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_keys_end_with_index() {
        assert!(is_reserved("namespaces.test.<index>"));
        assert!(is_reserved("<index>"));
        assert!(!is_reserved("namespaces.test.index"));
    }
}
