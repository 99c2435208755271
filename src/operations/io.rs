//! Reading inputs and writing outputs through the system abstraction

use crate::error::AsconfigError;
use crate::format::Format;
use crate::format::metadata::{self, Metadata};
use crate::model::Section;
use crate::normalize;
use crate::schema::hints::TypeHints;
use crate::system::System;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A parsed and normalized configuration file
#[derive(Debug, Clone)]
pub struct Loaded {
    pub format: Format,
    pub metadata: Metadata,
    pub document: Section,
}

/// Pick the input format: the explicit choice, else the file extension
///
/// # Errors
///
/// Returns a parse error if neither is available
#[inline]
pub fn detect_format(path: &Path, explicit: Option<Format>) -> Result<Format, AsconfigError> {
    explicit.or_else(|| Format::from_path(path)).ok_or_else(|| {
        AsconfigError::parse_unlocated(format!(
            "Cannot tell the format of {} from its extension; pass --format conf|yaml",
            path.display()
        ))
    })
}

/// Read a whole text file
///
/// # Errors
///
/// Returns a filesystem error if the file cannot be read
#[inline]
pub fn read_text(system: &dyn System, path: &Path) -> Result<String, AsconfigError> {
    system
        .read_to_string(path)
        .map_err(|e| AsconfigError::filesystem(format!("Failed to read {}: {e}", path.display())))
}

/// Parse configuration text and bring it to canonical form
///
/// # Errors
///
/// Returns an error if the text is malformed or cannot be normalized
#[inline]
pub fn parse_document(
    text: &str,
    format: Format,
    hints: Option<&TypeHints>,
) -> Result<Loaded, AsconfigError> {
    let metadata = metadata::parse(text);
    let mut document = format.read(text, hints)?;
    normalize::normalize(&mut document)?;
    Ok(Loaded {
        format,
        metadata,
        document,
    })
}

/// Render metadata comments followed by the document
///
/// # Errors
///
/// Returns an error if the document cannot be serialized
#[inline]
pub fn render(format: Format, metadata: &Metadata, document: &Section) -> Result<String> {
    let mut out = metadata::render(metadata);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format.write(document)?);
    Ok(out)
}

/// Where output for `input` goes when `output` names a file or a directory
#[must_use]
#[inline]
pub fn output_path(system: &dyn System, input: &Path, output: &Path, format: Format) -> PathBuf {
    if !system.is_dir(output) {
        return output.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map_or_else(|| "aerospike".into(), |stem| stem.to_string_lossy());
    output.join(format!("{stem}.{}", format.extension()))
}

/// Write rendered text, creating the parent directory when needed
///
/// # Errors
///
/// Returns a filesystem error if the directory or file cannot be written
#[inline]
pub fn write_text(system: &dyn System, path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !system.exists(parent)
    {
        debug!("Creating output directory: {}", parent.display());
        system
            .create_dir_all(parent)
            .map_err(|e| {
                AsconfigError::filesystem(format!("Failed to create {}: {e}", parent.display()))
            })?;
    }
    system
        .write(path, text.as_bytes())
        .map_err(|e| {
            AsconfigError::filesystem(format!("Failed to write {}: {e}", path.display()))
        })?;
    info!("Wrote {}", path.display());
    Ok(())
}
