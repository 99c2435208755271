//! Comparison of two configuration files or two schema versions

use super::{io, schemas};
use crate::diff::{ConfigDiff, SchemaDiff, SchemaDiffOptions, diff_documents};
use crate::format::Format;
use crate::format::metadata;
use crate::model::Section;
use crate::system::System;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DiffFilesOptions {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Format of both inputs, detected per file when absent
    pub format: Option<Format>,
    /// Version used for typing block-format values when a schema is available
    pub server_version: Option<String>,
    pub schema_dir: PathBuf,
}

/// Key-wise comparison of two configuration files
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "DiffFilesOperation")]
pub struct DiffFilesOperation<'src> {
    options: DiffFilesOptions,
    system: &'src dyn System,
}

impl<'src> DiffFilesOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(options: DiffFilesOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Load both files and compare them
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read, parsed or normalized
    #[inline]
    pub fn execute(&self) -> Result<ConfigDiff> {
        let left = self.load(&self.options.left)?;
        let right = self.load(&self.options.right)?;
        let diff = diff_documents(&left, &right);
        info!(
            "Found {} difference(s) between {} and {}",
            diff.len(),
            self.options.left.display(),
            self.options.right.display()
        );
        Ok(diff)
    }

    fn load(&self, path: &Path) -> Result<Section> {
        let format = io::detect_format(path, self.options.format)?;
        let text = io::read_text(self.system, path)?;
        let version = schemas::server_version(
            self.options.server_version.as_deref(),
            &metadata::parse(&text),
        );
        let hints = match format {
            Format::Block => {
                schemas::optional(self.system, &self.options.schema_dir, version.as_deref())
                    .map(|schema| schema.hints())
            }
            Format::Yaml => None,
        };
        debug!(
            "Loading {} as {format} ({} type hints)",
            path.display(),
            if hints.is_some() { "with" } else { "without" }
        );
        Ok(io::parse_document(&text, format, hints.as_ref())?.document)
    }
}

#[derive(Debug, Clone)]
pub struct DiffVersionsOptions {
    pub old: String,
    pub new: String,
    pub schema_dir: PathBuf,
    pub filter_path: Option<String>,
    pub verbose: bool,
}

/// Structural comparison of the schemas of two server versions
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "DiffVersionsOperation")]
pub struct DiffVersionsOperation<'src> {
    options: DiffVersionsOptions,
    system: &'src dyn System,
}

impl<'src> DiffVersionsOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(options: DiffVersionsOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Resolve both schemas and walk them
    ///
    /// # Errors
    ///
    /// Returns a schema error if either version is unsupported or its schema is malformed
    #[inline]
    pub fn execute(&self) -> Result<SchemaDiff> {
        let options = &self.options;
        let old = schemas::resolve(self.system, &options.schema_dir, &options.old)?;
        let new = schemas::resolve(self.system, &options.schema_dir, &options.new)?;

        let diff = SchemaDiff::compute(
            &old.schema,
            &new.schema,
            &SchemaDiffOptions {
                filter_path: options.filter_path.clone(),
                verbose: options.verbose,
            },
        );
        info!(
            "Schema {} → {}: {} added, {} removed, {} changed",
            old.version,
            new.version,
            diff.added(),
            diff.removed(),
            diff.changed()
        );
        Ok(diff)
    }
}
