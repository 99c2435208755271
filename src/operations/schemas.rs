//! Schema lookup shared by the commands

use crate::error::AsconfigError;
use crate::format::metadata::{self, Metadata};
use crate::model::Section;
use crate::schema::validation::{JsonSchemaValidator, ValidationReport, Validator as _};
use crate::schema::{SchemaRegistry, TypeHints};
use crate::system::System;
use anyhow::Result;
use serde_json::Value as Json;
use std::path::Path;
use tracing::{debug, info, warn};

/// The schema serving one server version
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// Server version as requested
    pub requested: String,
    /// Version of the schema file that serves it
    pub version: String,
    pub schema: Json,
}

impl ResolvedSchema {
    /// Type hints for readers of untyped input
    #[must_use]
    #[inline]
    pub fn hints(&self) -> TypeHints {
        TypeHints::new(self.schema.clone())
    }

    /// Validate a canonical document against this schema
    ///
    /// # Errors
    ///
    /// Returns an error if the schema does not compile or the document cannot be presented to it
    #[inline]
    pub fn validate(&self, document: &Section) -> Result<ValidationReport> {
        let report = JsonSchemaValidator::new(&self.schema)?.validate(document)?;
        debug!(
            "Validated against schema {} with {} issue(s)",
            self.version,
            report.len()
        );
        Ok(report)
    }
}

/// Server version from the command line, else from the file metadata
#[must_use]
#[inline]
pub fn server_version(explicit: Option<&str>, metadata: &Metadata) -> Option<String> {
    explicit
        .map(str::to_owned)
        .or_else(|| metadata.get(metadata::SERVER_VERSION).cloned())
}

/// Load the schema serving `version` from the schema directory
///
/// # Errors
///
/// Returns a schema error if the directory is missing, the version is
/// unsupported or the schema is not valid JSON
#[inline]
pub fn resolve(system: &dyn System, schema_dir: &Path, version: &str) -> Result<ResolvedSchema> {
    let registry = SchemaRegistry::load_dir(system, schema_dir)?;
    let resolved = registry.resolve(version)?.to_string();
    let schema = registry.schema(version)?;
    if resolved == version {
        info!("Using schema for server version {version}");
    } else {
        info!("Using schema {resolved} for server version {version}");
    }
    Ok(ResolvedSchema {
        requested: version.to_owned(),
        version: resolved,
        schema,
    })
}

/// Resolve a schema that the command cannot do without
///
/// # Errors
///
/// Returns a schema error if no version is known or [`resolve`] fails
#[inline]
pub fn require(
    system: &dyn System,
    schema_dir: &Path,
    version: Option<&str>,
) -> Result<ResolvedSchema> {
    let Some(version) = version else {
        return Err(AsconfigError::schema(format!(
            "The server version is unknown. \
             Pass --aerospike-version or add a '# {}: <version>' comment",
            metadata::SERVER_VERSION
        ))
        .into());
    };
    resolve(system, schema_dir, version)
}

/// Resolve a schema when one is available, carrying on without it otherwise
#[must_use]
#[inline]
pub fn optional(
    system: &dyn System,
    schema_dir: &Path,
    version: Option<&str>,
) -> Option<ResolvedSchema> {
    let version = version?;
    match resolve(system, schema_dir, version) {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            warn!("Continuing without a schema for version {version}: {err:#}");
            None
        }
    }
}

/// Supported server versions, oldest first
///
/// # Errors
///
/// Returns an error if the schema directory cannot be read
#[inline]
pub fn versions(system: &dyn System, schema_dir: &Path) -> Result<Vec<String>> {
    Ok(SchemaRegistry::load_dir(system, schema_dir)?.versions())
}
