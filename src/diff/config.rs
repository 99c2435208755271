//! Key-wise comparison of two configurations

use super::flatten::{FlatMap, flatten, is_reserved};
use crate::model::{Scalar, Section};
use core::fmt::Write as _;
use std::collections::BTreeSet;

/// Prefix of keys whose string values compare case-insensitively
const LOGGING_PREFIX: &str = "logging.";

/// One difference between two flattened configurations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DiffEntry {
    /// Present only on the right
    Added(String),
    /// Present only on the left
    Removed(String),
    /// Present on both sides with different values
    Changed {
        key: String,
        left: Scalar,
        right: Scalar,
    },
}

/// Every difference between two configurations, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDiff {
    entries: Vec<DiffEntry>,
}

impl ConfigDiff {
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    #[inline]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Render the report: `>: key`, `<: key`, or the key with both values
    #[must_use]
    #[inline]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = match entry {
                DiffEntry::Added(key) => writeln!(out, ">: {key}"),
                DiffEntry::Removed(key) => writeln!(out, "<: {key}"),
                DiffEntry::Changed { key, left, right } => {
                    writeln!(out, "{key}:\n\t<: {left}\n\t>: {right}")
                }
            };
        }
        out
    }
}

/// Compare two flattened configurations
#[must_use]
#[inline]
pub fn diff_flat(left: &FlatMap, right: &FlatMap) -> ConfigDiff {
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    let entries = keys
        .into_iter()
        .filter(|key| !is_reserved(key))
        .filter_map(|key| match (left.get(key), right.get(key)) {
            (None, Some(_)) => Some(DiffEntry::Added(key.clone())),
            (Some(_), None) => Some(DiffEntry::Removed(key.clone())),
            (Some(left), Some(right)) if !values_match(key, left, right) => {
                Some(DiffEntry::Changed {
                    key: key.clone(),
                    left: left.clone(),
                    right: right.clone(),
                })
            }
            _ => None,
        })
        .collect();

    ConfigDiff { entries }
}

/// Flatten and compare two canonical documents
#[must_use]
#[inline]
pub fn diff_documents(left: &Section, right: &Section) -> ConfigDiff {
    diff_flat(&flatten(left), &flatten(right))
}

fn values_match(key: &str, left: &Scalar, right: &Scalar) -> bool {
    if key.starts_with(LOGGING_PREFIX) {
        left.eq_ignore_case(right)
    } else {
        left == right
    }
}
