//! Conversion between the block and YAML formats

use super::io::{self, Loaded};
use super::schemas;
use crate::format::Format;
use crate::format::metadata;
use crate::system::System;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs of a conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    /// Output file or directory; stdout when absent
    pub output: Option<PathBuf>,
    /// Input format, detected from the extension when absent
    pub format: Option<Format>,
    pub server_version: Option<String>,
    /// Skip validation and accept an unknown server version
    pub force: bool,
    pub schema_dir: PathBuf,
}

/// Converts one configuration file to the other format
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "ConvertOperation")]
pub struct ConvertOperation<'src> {
    options: ConvertOptions,
    system: &'src dyn System,
}

impl<'src> ConvertOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(options: ConvertOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Run the conversion
    ///
    /// Returns the converted text when no output path was given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input cannot be read or parsed
    /// - No schema serves the server version and `force` is off
    /// - The document fails validation and `force` is off
    /// - The output cannot be written
    #[inline]
    pub fn execute(&self) -> Result<Option<String>> {
        let options = &self.options;
        let format = io::detect_format(&options.input, options.format)?;
        let text = io::read_text(self.system, &options.input)?;
        let version = schemas::server_version(
            options.server_version.as_deref(),
            &metadata::parse(&text),
        );

        let schema = if options.force {
            schemas::optional(self.system, &options.schema_dir, version.as_deref())
        } else {
            Some(schemas::require(self.system, &options.schema_dir, version.as_deref())?)
        };
        let hints = schema.as_ref().map(schemas::ResolvedSchema::hints);

        let Loaded {
            mut metadata,
            document,
            ..
        } = io::parse_document(&text, format, hints.as_ref())?;

        match (&schema, options.force) {
            (Some(schema), false) => schema.validate(&document)?.into_result()?,
            (_, true) => warn!("Skipping validation of {}", options.input.display()),
            (None, false) => {}
        }

        if let Some(version) = version {
            metadata.insert(metadata::SERVER_VERSION.to_owned(), version);
        }
        metadata.insert(
            metadata::TOOL_VERSION.to_owned(),
            env!("CARGO_PKG_VERSION").to_owned(),
        );

        let target = format.opposite();
        let rendered = io::render(target, &metadata, &document)?;
        info!(
            "Converted {} from {format} to {target}",
            options.input.display()
        );

        match &options.output {
            Some(output) => {
                let path = io::output_path(self.system, &options.input, output, target);
                io::write_text(self.system, &path, &rendered)?;
                Ok(None)
            }
            None => Ok(Some(rendered)),
        }
    }
}
