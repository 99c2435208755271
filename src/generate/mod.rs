//! Configuration generation from a server snapshot
//!
//! A snapshot is the nested JSON object produced by the server's info
//! interface. Keys may be dotted (`heartbeat.mode`) and may carry a list
//! index (`storage-engine.file[0]`); values are mostly untyped strings.
//! The generator expands the keys, types the values with schema hints, and
//! hands back a canonical document.

use crate::error::AsconfigError;
use crate::format::metadata::{self, Metadata};
use crate::model::{NAME_KEY, Scalar, Section, TYPE_KEY, Value};
use crate::normalize::{self, keys};
use crate::schema::hints::{TypeHints, type_token};
use regex::Regex;
use serde_json::{Map, Value as Json};
use std::sync::LazyLock;
use tracing::debug;

/// Top-level snapshot key holding the server build
const BUILD_KEY: &str = "build";

/// Keys whose object value maps identifier to section
const IDENTIFIED_COLLECTIONS: &[&str] = &[
    "namespaces",
    "namespace",
    "sets",
    "set",
    "dcs",
    "dc",
    "datacenters",
    "datacenter",
    "logging",
    "tls",
];

static INDEXED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\[([0-9]+)\]$").expect("valid indexed key pattern"));

/// A generated document with the metadata recovered from the snapshot
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub document: Section,
    pub metadata: Metadata,
}

/// Parse snapshot text
///
/// # Errors
///
/// Returns a parse error if the text is not JSON or its root is not an object
#[inline]
pub fn parse_snapshot(input: &str) -> Result<Json, AsconfigError> {
    let snapshot: Json = serde_json::from_str(input)
        .map_err(|e| AsconfigError::parse(e.line(), e.column(), e.to_string()))?;
    if !snapshot.is_object() {
        return Err(AsconfigError::parse_unlocated(
            "snapshot root must be a JSON object",
        ));
    }
    Ok(snapshot)
}

/// Builds canonical documents from snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct Generator<'h> {
    hints: Option<&'h TypeHints>,
}

impl<'h> Generator<'h> {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self { hints: None }
    }

    /// Type string values with the given schema hints
    #[must_use]
    #[inline]
    pub const fn with_hints(mut self, hints: &'h TypeHints) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Turn a snapshot into a normalized document
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshot root is not an object
    /// - A key is used both as a value and as a section
    /// - A value is null or a list mixes scalars and objects
    /// - The resulting document cannot be normalized
    #[inline]
    pub fn generate(&self, snapshot: &Json) -> Result<Generated, AsconfigError> {
        let Some(object) = snapshot.as_object() else {
            return Err(AsconfigError::parse_unlocated(
                "snapshot root must be a JSON object",
            ));
        };

        let mut recovered = Metadata::new();
        let mut body = object.clone();
        if let Some(build) = body.remove(BUILD_KEY) {
            let build = build
                .as_str()
                .map_or_else(|| build.to_string(), str::to_owned);
            debug!("Snapshot taken from server build {build}");
            recovered.insert(metadata::SERVER_VERSION.to_owned(), build);
        }

        let root_schema = self.hints.map(TypeHints::root);
        let mut document = self.build_section(&body, root_schema, "")?;
        normalize::normalize(&mut document)?;

        Ok(Generated {
            document,
            metadata: recovered,
        })
    }

    fn build_section(
        &self,
        object: &Map<String, Json>,
        schema: Option<&Json>,
        path: &str,
    ) -> Result<Section, AsconfigError> {
        let mut entries: Vec<(&String, &Json)> = object.iter().collect();
        entries.sort_by_cached_key(|(key, _)| natural_key(key));

        let mut section = Section::new();
        for (key, value) in entries {
            self.assign(&mut section, schema, key, value, path)?;
        }
        Ok(section)
    }

    /// Assign a possibly dotted key, creating intermediate sections
    fn assign(
        &self,
        section: &mut Section,
        schema: Option<&Json>,
        key: &str,
        value: &Json,
        path: &str,
    ) -> Result<(), AsconfigError> {
        let mut segments: Vec<&str> = key.split('.').collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut target = section;
        let mut node = schema;
        let mut here = path.to_owned();
        for segment in segments {
            here = join(&here, segment);
            let entry = target.entry_or_insert_with(segment, || Value::Section(Section::new()));
            if keys::is_typed_context(segment)
                && let Value::Scalar(kind) = entry
            {
                let promoted = Value::Section(Section::new().with(TYPE_KEY, kind.clone()));
                *entry = promoted;
            }
            let Value::Section(child) = entry else {
                return Err(AsconfigError::parse_unlocated(format!(
                    "'{here}' is used both as a value and as a section"
                )));
            };
            let identifier = child
                .get(TYPE_KEY)
                .and_then(Value::as_scalar)
                .and_then(Scalar::as_str);
            node = self.child_schema(node, segment, identifier);
            target = child;
        }

        self.assign_leaf(target, node, leaf, value, &here)
    }

    fn assign_leaf(
        &self,
        target: &mut Section,
        schema: Option<&Json>,
        key: &str,
        value: &Json,
        path: &str,
    ) -> Result<(), AsconfigError> {
        if let Some(captures) = INDEXED_KEY.captures(key) {
            let base = captures.get(1).map_or(key, |m| m.as_str());
            let here = join(path, base);
            let Value::Scalar(item) = self.convert(schema, base, value, &here)? else {
                return Err(AsconfigError::parse_unlocated(format!(
                    "'{here}' must hold scalar list elements"
                )));
            };
            let entry = target.entry_or_insert_with(base, || Value::Scalars(Vec::new()));
            let Value::Scalars(items) = entry else {
                return Err(AsconfigError::parse_unlocated(format!(
                    "'{here}' is used both as a list and as a single value"
                )));
            };
            items.push(item);
            return Ok(());
        }

        let here = join(path, key);
        let converted = self.convert(schema, key, value, &here)?;
        let Some(existing) = target.get_mut(key) else {
            target.insert(key, converted);
            return Ok(());
        };
        match (existing, converted) {
            (Value::Section(existing), Value::Scalar(kind)) if keys::is_typed_context(key) => {
                existing.insert_first(TYPE_KEY, kind);
            }
            (Value::Section(existing), Value::Section(extra)) => {
                for (child, child_value) in extra {
                    existing.insert(child, child_value);
                }
            }
            _ => {
                return Err(AsconfigError::parse_unlocated(format!(
                    "'{here}' is defined more than once"
                )));
            }
        }
        Ok(())
    }

    fn convert(
        &self,
        schema: Option<&Json>,
        key: &str,
        value: &Json,
        path: &str,
    ) -> Result<Value, AsconfigError> {
        match value {
            Json::Null => Err(AsconfigError::parse_unlocated(format!(
                "'{path}' has no value"
            ))),
            Json::Bool(_) | Json::Number(_) | Json::String(_) => {
                self.scalar(schema, key, value, path).map(Value::Scalar)
            }
            Json::Array(items) => self.convert_list(schema, key, items, path),
            Json::Object(object) if is_identified_collection(key) => {
                let mut sections = Vec::with_capacity(object.len());
                for (identifier, body) in object {
                    let here = join(path, identifier);
                    let Some(body) = body.as_object() else {
                        return Err(AsconfigError::parse_unlocated(format!(
                            "'{here}' must be an object"
                        )));
                    };
                    let node = self.child_schema(schema, key, Some(identifier));
                    let mut section = self.build_section(body, node, &here)?;
                    if !section.contains_key(NAME_KEY) {
                        section.insert_first(NAME_KEY, identifier.as_str());
                    }
                    sections.push(section);
                }
                Ok(Value::Sections(sections))
            }
            Json::Object(object) => {
                let identifier = object.get(TYPE_KEY).and_then(Json::as_str);
                let node = self.child_schema(schema, key, identifier);
                self.build_section(object, node, path).map(Value::Section)
            }
        }
    }

    fn convert_list(
        &self,
        schema: Option<&Json>,
        key: &str,
        items: &[Json],
        path: &str,
    ) -> Result<Value, AsconfigError> {
        if items.iter().all(Json::is_object) && !items.is_empty() {
            let node = self.child_schema(schema, key, None);
            return items
                .iter()
                .filter_map(Json::as_object)
                .map(|object| self.build_section(object, node, path))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sections);
        }
        items
            .iter()
            .map(|item| match item {
                Json::Bool(_) | Json::Number(_) | Json::String(_) => {
                    self.scalar(schema, key, item, path)
                }
                _ => Err(AsconfigError::parse_unlocated(format!(
                    "'{path}' mixes scalars with other values"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Scalars)
    }

    fn scalar(
        &self,
        schema: Option<&Json>,
        key: &str,
        value: &Json,
        path: &str,
    ) -> Result<Scalar, AsconfigError> {
        match value {
            Json::Bool(flag) => Ok(Scalar::Bool(*flag)),
            Json::Number(number) => number
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| number.as_u64().map(Scalar::UInt))
                .or_else(|| number.as_f64().map(Scalar::Float))
                .ok_or_else(|| AsconfigError::parse_unlocated(format!("'{path}' is out of range"))),
            Json::String(text) => {
                let hint = self.hints.and_then(|hints| hints.scalar(schema, key));
                Ok(type_token(text, hint))
            }
            _ => Err(AsconfigError::parse_unlocated(format!(
                "'{path}' is not a scalar"
            ))),
        }
    }

    fn child_schema<'s>(
        &self,
        parent: Option<&'s Json>,
        key: &str,
        identifier: Option<&str>,
    ) -> Option<&'s Json> {
        self.hints?.section(parent?, key, identifier)
    }
}

fn is_identified_collection(key: &str) -> bool {
    IDENTIFIED_COLLECTIONS.contains(&key)
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Sort key that orders `file[2]` before `file[10]`
fn natural_key(key: &str) -> Vec<(String, Option<u64>)> {
    key.split('.')
        .map(|segment| {
            INDEXED_KEY.captures(segment).map_or_else(
                || (segment.to_owned(), None),
                |captures| (captures[1].to_owned(), captures[2].parse().ok()),
            )
        })
        .collect()
}
