//! Structured (YAML) format reader and writer

use crate::error::AsconfigError;
use crate::model::{Scalar, Section, Value};
use anyhow::{Context as _, Result};
use serde_yaml::Value as Yaml;

/// Parse YAML text into a document
///
/// Leaf types follow the YAML scalars; no normalization is applied.
///
/// # Errors
///
/// Returns a parse error if:
/// - The text is not valid YAML
/// - The root is not a mapping
/// - A value is null, a key is not a string, or a list mixes sections and scalars
#[inline]
pub fn read(input: &str) -> Result<Section, AsconfigError> {
    let document: Yaml = serde_yaml::from_str(input).map_err(|e| {
        if let Some(location) = e.location() {
            AsconfigError::parse(location.line(), location.column(), e.to_string())
        } else {
            AsconfigError::parse_unlocated(e.to_string())
        }
    })?;

    match document {
        Yaml::Null => Ok(Section::new()),
        Yaml::Mapping(mapping) => section_from_yaml(mapping, ""),
        other => Err(AsconfigError::parse_unlocated(format!(
            "the document root must be a mapping, found {}",
            describe(&other)
        ))),
    }
}

/// Render a document as YAML, keeping the order of every section
///
/// # Errors
///
/// Returns an error if the document cannot be serialized
#[inline]
pub fn write(root: &Section) -> Result<String> {
    serde_yaml::to_string(root).context("Failed to serialize configuration as YAML")
}

fn section_from_yaml(mapping: serde_yaml::Mapping, path: &str) -> Result<Section, AsconfigError> {
    let mut section = Section::new();
    for (key, value) in mapping {
        let key = match key {
            Yaml::String(key) => key,
            other => {
                return Err(AsconfigError::parse_unlocated(format!(
                    "keys must be strings, found {} under '{path}'",
                    describe(&other)
                )));
            }
        };
        let child_path = join(path, &key);
        let value = value_from_yaml(value, &child_path)?;
        section.insert(key, value);
    }
    Ok(section)
}

fn value_from_yaml(value: Yaml, path: &str) -> Result<Value, AsconfigError> {
    match value {
        Yaml::Mapping(mapping) => Ok(Value::Section(section_from_yaml(mapping, path)?)),
        Yaml::Sequence(items) => sequence_from_yaml(items, path),
        Yaml::Tagged(tagged) => value_from_yaml(tagged.value, path),
        other => Ok(Value::Scalar(scalar_from_yaml(other, path)?)),
    }
}

fn sequence_from_yaml(items: Vec<Yaml>, path: &str) -> Result<Value, AsconfigError> {
    if items.iter().all(Yaml::is_mapping) && !items.is_empty() {
        let sections = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Yaml::Mapping(mapping) => {
                    section_from_yaml(mapping, &join(path, &index.to_string()))
                }
                _ => Err(AsconfigError::parse_unlocated(format!("expected a mapping at '{path}'"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Sections(sections));
    }

    let scalars = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Yaml::Mapping(_) | Yaml::Sequence(_) => Err(AsconfigError::parse_unlocated(format!(
                "list '{path}' mixes sections and values or nests lists (element {index})"
            ))),
            other => scalar_from_yaml(other, &join(path, &index.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Scalars(scalars))
}

fn scalar_from_yaml(value: Yaml, path: &str) -> Result<Scalar, AsconfigError> {
    match value {
        Yaml::Bool(flag) => Ok(Scalar::Bool(flag)),
        Yaml::Number(number) => number
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| number.as_u64().map(Scalar::UInt))
            .or_else(|| number.as_f64().map(Scalar::Float))
            .ok_or_else(|| {
                AsconfigError::parse_unlocated(format!("unsupported number at '{path}'"))
            }),
        Yaml::String(text) => Ok(Scalar::Str(text)),
        Yaml::Tagged(tagged) => scalar_from_yaml(tagged.value, path),
        Yaml::Null => Err(AsconfigError::parse_unlocated(format!("'{path}' has no value"))),
        Yaml::Mapping(_) | Yaml::Sequence(_) => {
            Err(AsconfigError::parse_unlocated(format!("expected a value at '{path}'")))
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

const fn describe(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a list",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}
