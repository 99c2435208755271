//! Per-server-version schema documents

use crate::error::AsconfigError;
use crate::system::System;
use anyhow::{Context as _, Result};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Dotted numeric server version such as `7.0.0` or `6.4.0.12`
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    text: String,
}

impl Version {
    /// Whether both versions share major and minor numbers
    #[must_use]
    #[inline]
    pub fn same_minor(&self, other: &Self) -> bool {
        self.parts.get(..2) == other.parts.get(..2)
    }

    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for Version {
    type Err = AsconfigError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AsconfigError::schema(format!("Invalid server version '{s}'")))?;
        Ok(Self {
            parts,
            text: s.to_owned(),
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Mapping from server version to JSON Schema text
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<Version, String>,
}

impl SchemaRegistry {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the version is not dotted numeric
    #[inline]
    pub fn with_schema(mut self, version: &str, schema: &str) -> Result<Self, AsconfigError> {
        self.schemas.insert(version.parse()?, schema.to_owned());
        Ok(self)
    }

    /// Load every `<version>.json` file of a directory
    ///
    /// Files whose stem is not a version are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory does not exist
    /// - A schema file cannot be read
    #[inline]
    pub fn load_dir(system: &dyn System, dir: &Path) -> Result<Self> {
        if !system.is_dir(dir) {
            return Err(AsconfigError::schema(format!(
                "Schema directory not found: {}\n\
                Point --schema-dir or ASCONFIG_SCHEMA_DIR at a directory of <version>.json files",
                dir.display()
            ))
            .into());
        }

        let mut registry = Self::new();
        let mut entries = system
            .read_dir(dir)
            .with_context(|| format!("Failed to list schema directory: {}", dir.display()))?;
        entries.sort();

        for path in entries {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Ok(version) = stem.parse::<Version>() else {
                warn!("Skipping schema file with a non-version name: {}", path.display());
                continue;
            };
            let text = system
                .read_to_string(&path)
                .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
            registry.schemas.insert(version, text);
        }

        debug!("Loaded {} schema(s) from {}", registry.schemas.len(), dir.display());
        Ok(registry)
    }

    /// Supported versions, oldest first
    #[must_use]
    #[inline]
    pub fn versions(&self) -> Vec<String> {
        self.schemas.keys().map(ToString::to_string).collect()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Pick the schema version serving a requested server version
    ///
    /// An exact match wins; otherwise the newest schema of the same
    /// major.minor line that is not newer than the request.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the version is malformed or unsupported
    #[inline]
    pub fn resolve(&self, requested: &str) -> Result<&Version, AsconfigError> {
        let wanted: Version = requested.parse()?;
        if let Some((version, _)) = self.schemas.get_key_value(&wanted) {
            return Ok(version);
        }
        self.schemas
            .keys()
            .filter(|candidate| candidate.same_minor(&wanted) && **candidate <= wanted)
            .next_back()
            .ok_or_else(|| {
                AsconfigError::schema(format!(
                    "Unsupported server version '{requested}'. Supported versions: {}",
                    self.versions().join(", ")
                ))
            })
    }

    /// Raw schema text serving a server version
    ///
    /// # Errors
    ///
    /// Returns a schema error if the version is unsupported
    #[inline]
    pub fn schema_text(&self, requested: &str) -> Result<&str, AsconfigError> {
        let version = self.resolve(requested)?;
        self.schemas
            .get(version)
            .map(String::as_str)
            .ok_or_else(|| {
                AsconfigError::schema(format!("Unsupported server version '{requested}'"))
            })
    }

    /// Parsed schema serving a server version
    ///
    /// # Errors
    ///
    /// Returns a schema error if the version is unsupported or the schema is not valid JSON
    #[inline]
    pub fn schema(&self, requested: &str) -> Result<Json, AsconfigError> {
        let text = self.schema_text(requested)?;
        serde_json::from_str(text).map_err(|e| {
            AsconfigError::schema(format!("Failed to parse schema for version '{requested}': {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_schema("6.4.0", "{}")
            .unwrap()
            .with_schema("7.0.0", "{}")
            .unwrap()
            .with_schema("7.0.2", "{}")
            .unwrap()
    }

    #[test]
    fn resolves_exact_and_patch_versions() {
        let registry = registry();
        assert_eq!(registry.resolve("7.0.0").unwrap().as_str(), "7.0.0");
        assert_eq!(registry.resolve("7.0.1.5").unwrap().as_str(), "7.0.0");
        assert_eq!(registry.resolve("7.0.3").unwrap().as_str(), "7.0.2");
        assert_eq!(registry.resolve("6.4.0.12").unwrap().as_str(), "6.4.0");
    }

    #[test]
    fn rejects_unknown_lines() {
        let err = registry().resolve("5.7.0").unwrap_err();
        assert!(err.to_string().contains("Supported versions: 6.4.0, 7.0.0, 7.0.2"));
        assert!(registry().resolve("latest").is_err());
    }

    #[test]
    fn versions_sort_numerically() {
        let registry = SchemaRegistry::new()
            .with_schema("10.0.0", "{}")
            .unwrap()
            .with_schema("9.1.0", "{}")
            .unwrap();
        assert_eq!(registry.versions(), ["9.1.0", "10.0.0"]);
    }
}
