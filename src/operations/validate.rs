//! Validation of a configuration file against its server version's schema

use super::{io, schemas};
use crate::format::Format;
use crate::format::metadata;
use crate::schema::validation::ValidationReport;
use crate::system::System;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub input: PathBuf,
    pub format: Option<Format>,
    pub server_version: Option<String>,
    pub schema_dir: PathBuf,
}

/// Checks one configuration file
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "ValidateOperation")]
pub struct ValidateOperation<'src> {
    options: ValidateOptions,
    system: &'src dyn System,
}

impl<'src> ValidateOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(options: ValidateOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Parse, normalize and validate the file
    ///
    /// The report is returned even when it holds issues; turning it into a
    /// failure is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, or no schema
    /// serves its server version
    #[inline]
    pub fn execute(&self) -> Result<ValidationReport> {
        let options = &self.options;
        let format = io::detect_format(&options.input, options.format)?;
        let text = io::read_text(self.system, &options.input)?;
        let version = schemas::server_version(
            options.server_version.as_deref(),
            &metadata::parse(&text),
        );
        let schema = schemas::require(self.system, &options.schema_dir, version.as_deref())?;
        let hints = schema.hints();

        let loaded = io::parse_document(&text, format, Some(&hints))?;
        let report = schema.validate(&loaded.document)?;

        if report.is_empty() {
            info!(
                "{} is valid for server version {}",
                options.input.display(),
                schema.requested
            );
        } else {
            info!(
                "{} has {} validation issue(s)",
                options.input.display(),
                report.len()
            );
        }
        Ok(report)
    }
}
