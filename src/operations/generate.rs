//! Configuration generation from a server snapshot file

use super::{io, schemas};
use crate::format::Format;
use crate::format::metadata;
use crate::generate::{Generator, parse_snapshot};
use crate::system::System;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Snapshot key holding the server build
const BUILD_KEY: &str = "build";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub snapshot: PathBuf,
    /// Output file or directory; stdout when absent
    pub output: Option<PathBuf>,
    /// Output format
    pub format: Format,
    /// Overrides the build recorded in the snapshot
    pub server_version: Option<String>,
    /// Skip validation and accept an unknown server version
    pub force: bool,
    pub schema_dir: PathBuf,
}

/// Writes a configuration file describing a server snapshot
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "GenerateOperation")]
pub struct GenerateOperation<'src> {
    options: GenerateOptions,
    system: &'src dyn System,
}

impl<'src> GenerateOperation<'src> {
    #[must_use]
    #[inline]
    pub fn new(options: GenerateOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Generate the configuration
    ///
    /// Returns the generated text when no output path was given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshot cannot be read or is not a JSON object
    /// - No schema serves the server version and `force` is off
    /// - The generated document fails validation and `force` is off
    /// - The output cannot be written
    #[inline]
    pub fn execute(&self) -> Result<Option<String>> {
        let options = &self.options;
        let snapshot = parse_snapshot(&io::read_text(self.system, &options.snapshot)?)?;
        let version = options.server_version.clone().or_else(|| {
            snapshot
                .get(BUILD_KEY)
                .and_then(|build| build.as_str())
                .map(str::to_owned)
        });

        let schema = if options.force {
            schemas::optional(self.system, &options.schema_dir, version.as_deref())
        } else {
            Some(schemas::require(self.system, &options.schema_dir, version.as_deref())?)
        };
        let hints = schema.as_ref().map(schemas::ResolvedSchema::hints);

        let generator = hints
            .as_ref()
            .map_or_else(Generator::new, |hints| Generator::new().with_hints(hints));
        let generated = generator.generate(&snapshot)?;

        match (&schema, options.force) {
            (Some(schema), false) => schema.validate(&generated.document)?.into_result()?,
            (_, true) => warn!("Skipping validation of the generated configuration"),
            (None, false) => {}
        }

        let mut recorded = generated.metadata;
        if let Some(version) = version {
            recorded.insert(metadata::SERVER_VERSION.to_owned(), version);
        }
        recorded.insert(
            metadata::TOOL_VERSION.to_owned(),
            env!("CARGO_PKG_VERSION").to_owned(),
        );

        let rendered = io::render(options.format, &recorded, &generated.document)?;
        info!(
            "Generated {} configuration from {}",
            options.format,
            options.snapshot.display()
        );

        match &options.output {
            Some(output) => {
                let path = io::output_path(self.system, &options.snapshot, output, options.format);
                io::write_text(self.system, &path, &rendered)?;
                Ok(None)
            }
            None => Ok(Some(rendered)),
        }
    }
}
