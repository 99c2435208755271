//! Structural comparison of two versioned JSON schemas
//!
//! Both schemas are walked in parallel starting at the root `properties`.
//! A node's path is the dotted chain of property names, with `items` and
//! `oneOf.<n>` segments for array elements and alternatives. Each node is
//! reported at most once: added and removed nodes take their whole subtree
//! with them, changed nodes compare their own attributes and then descend.

use core::fmt::Write as _;
use serde_json::{Map, Value as Json};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Keys that hold child schemas rather than attributes of the node itself
const STRUCTURAL_KEYS: [&str; 3] = ["properties", "items", "oneOf"];

/// Attributes summarised for changed nodes in verbose output
const SUMMARY_ATTRIBUTES: [&str; 4] = ["type", "default", "enterpriseOnly", "dynamic"];

const MISSING: &str = "<none>";

/// What happened to a schema node between the two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

impl ChangeKind {
    #[must_use]
    #[inline]
    pub const fn sign(self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Changed => '~',
        }
    }
}

/// One reported node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaChange {
    pub kind: ChangeKind,
    pub path: String,
    /// Attribute summary shown in verbose output
    pub summary: Option<String>,
}

/// Knobs for [`SchemaDiff::compute`]
#[derive(Debug, Clone, Default)]
pub struct SchemaDiffOptions {
    /// Only report nodes at or below this dotted path
    pub filter_path: Option<String>,
    /// Include attribute summaries in the rendered report
    pub verbose: bool,
}

/// Result of comparing two schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff {
    changes: Vec<SchemaChange>,
    verbose: bool,
}

impl SchemaDiff {
    /// Compare `old` against `new`
    #[must_use]
    #[inline]
    pub fn compute(old: &Json, new: &Json, options: &SchemaDiffOptions) -> Self {
        let mut walker = Walker {
            filter: options.filter_path.as_deref().map(|path| path.trim_matches('.')),
            changes: Vec::new(),
        };
        let mut visited = HashSet::new();
        walker.compare_properties("", Some(old), Some(new), &mut visited);

        Self {
            changes: walker.changes,
            verbose: options.verbose,
        }
    }

    #[must_use]
    #[inline]
    pub fn changes(&self) -> &[SchemaChange] {
        &self.changes
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn added(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    #[must_use]
    #[inline]
    pub fn removed(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    #[must_use]
    #[inline]
    pub fn changed(&self) -> usize {
        self.count(ChangeKind::Changed)
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|change| change.kind == kind).count()
    }

    /// Render one line per change followed by the summary line
    #[must_use]
    #[inline]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for change in &self.changes {
            let _ = write!(out, "{} {}", change.kind.sign(), change.path);
            if self.verbose
                && let Some(summary) = &change.summary
            {
                let _ = write!(out, " ({summary})");
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "\nSummary: {} added, {} removed, {} changed",
            self.added(),
            self.removed(),
            self.changed()
        );
        out
    }
}

/// How the path filter treats a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    /// Report the node and its subtree
    Emit,
    /// Descend without reporting, an ancestor of the filter path
    Traverse,
    /// Outside the filter
    Skip,
}

struct Walker<'o> {
    filter: Option<&'o str>,
    changes: Vec<SchemaChange>,
}

impl Walker<'_> {
    fn visibility(&self, path: &str) -> Visibility {
        let Some(filter) = self.filter.filter(|filter| !filter.is_empty()) else {
            return Visibility::Emit;
        };
        if path == filter || is_descendant(path, filter) {
            Visibility::Emit
        } else if is_descendant(filter, path) {
            Visibility::Traverse
        } else {
            Visibility::Skip
        }
    }

    fn compare_properties(
        &mut self,
        parent: &str,
        old: Option<&Json>,
        new: Option<&Json>,
        visited: &mut HashSet<String>,
    ) {
        let old_props = old.and_then(|node| node.get("properties")).and_then(Json::as_object);
        let new_props = new.and_then(|node| node.get("properties")).and_then(Json::as_object);

        let keys: BTreeSet<&String> = old_props
            .into_iter()
            .flat_map(Map::keys)
            .chain(new_props.into_iter().flat_map(Map::keys))
            .collect();

        for key in keys {
            self.compare_node(
                &join(parent, key),
                old_props.and_then(|props| props.get(key)),
                new_props.and_then(|props| props.get(key)),
                visited,
            );
        }
    }

    fn compare_children(
        &mut self,
        path: &str,
        old: Option<&Json>,
        new: Option<&Json>,
        visited: &mut HashSet<String>,
    ) {
        self.compare_properties(path, old, new, visited);

        let old_items = old.and_then(|node| node.get("items"));
        let new_items = new.and_then(|node| node.get("items"));
        if old_items.is_some() || new_items.is_some() {
            self.compare_node(&join(path, "items"), old_items, new_items, visited);
        }

        let old_alts = old.and_then(|node| node.get("oneOf")).and_then(Json::as_array);
        let new_alts = new.and_then(|node| node.get("oneOf")).and_then(Json::as_array);
        let count = old_alts.map_or(0, Vec::len).max(new_alts.map_or(0, Vec::len));
        for index in 0..count {
            self.compare_node(
                &format!("{}.{index}", join(path, "oneOf")),
                old_alts.and_then(|alts| alts.get(index)),
                new_alts.and_then(|alts| alts.get(index)),
                visited,
            );
        }
    }

    fn compare_node(
        &mut self,
        path: &str,
        old: Option<&Json>,
        new: Option<&Json>,
        visited: &mut HashSet<String>,
    ) {
        let visibility = self.visibility(path);
        if visibility == Visibility::Skip {
            return;
        }
        if visibility == Visibility::Emit && !visited.insert(path.to_owned()) {
            return;
        }

        let change = match (old, new) {
            (None, Some(node)) => Some((ChangeKind::Added, added_summary(node))),
            (Some(node), None) => Some((ChangeKind::Removed, removed_summary(node))),
            (Some(old_node), Some(new_node)) => {
                let (old_attrs, new_attrs) = (attributes(old_node), attributes(new_node));
                (!attributes_match(&old_attrs, &new_attrs))
                    .then(|| (ChangeKind::Changed, changed_summary(&old_attrs, &new_attrs)))
            }
            (None, None) => None,
        };

        if visibility == Visibility::Emit
            && let Some((kind, summary)) = change
        {
            self.changes.push(SchemaChange {
                kind,
                path: path.to_owned(),
                summary,
            });
        }

        self.compare_children(path, old, new, visited);
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// The node's own attributes, without its child schemas
fn attributes(node: &Json) -> BTreeMap<&str, &Json> {
    node.as_object()
        .into_iter()
        .flatten()
        .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value))
        .collect()
}

fn attributes_match(old: &BTreeMap<&str, &Json>, new: &BTreeMap<&str, &Json>) -> bool {
    old.len() == new.len()
        && old.iter().all(|(key, old_value)| {
            new.get(key)
                .is_some_and(|new_value| attribute_eq(key, old_value, new_value))
        })
}

/// Numeric defaults compare by value so `1` and `1.0` are the same
fn attribute_eq(key: &str, old: &Json, new: &Json) -> bool {
    if key == "default"
        && let (Some(old), Some(new)) = (old.as_f64(), new.as_f64())
    {
        return (old - new).abs() < f64::EPSILON;
    }
    old == new
}

fn render_json(value: &Json) -> String {
    match value {
        Json::String(text) => text.clone(),
        Json::Array(items) => items.iter().map(render_json).collect::<Vec<_>>().join("|"),
        other => other.to_string(),
    }
}

fn describe(node: &Json, type_label: &str) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(kind) = node.get("type") {
        parts.push(format!("{type_label}: {}", render_json(kind)));
    }
    if let Some(default) = node.get("default") {
        parts.push(format!("default: {}", render_json(default)));
    }
    if node.get("enterpriseOnly").and_then(Json::as_bool) == Some(true) {
        parts.push("enterprise-only".to_owned());
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn added_summary(node: &Json) -> Option<String> {
    describe(node, "type")
}

fn removed_summary(node: &Json) -> Option<String> {
    describe(node, "was type")
}

fn changed_summary(old: &BTreeMap<&str, &Json>, new: &BTreeMap<&str, &Json>) -> Option<String> {
    let parts: Vec<String> = SUMMARY_ATTRIBUTES
        .iter()
        .filter_map(|attribute| {
            let (before, after) = (old.get(attribute), new.get(attribute));
            let same = match (before, after) {
                (Some(before), Some(after)) => attribute_eq(attribute, before, after),
                (None, None) => true,
                _ => false,
            };
            (!same).then(|| {
                let show = |value: Option<&&Json>| {
                    value.map_or_else(|| MISSING.to_owned(), |v| render_json(v))
                };
                format!("{attribute}: {} → {}", show(before), show(after))
            })
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
