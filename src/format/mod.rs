//! Textual formats of a configuration
//!
//! Both formats read into and write from the same [`Section`] tree.

pub mod block;
pub mod metadata;
pub mod yaml;

use crate::error::AsconfigError;
use crate::model::Section;
use crate::schema::hints::TypeHints;
use anyhow::Result;
use core::fmt;
use core::str::FromStr;
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Format {
    /// `aerospike.conf` block format
    Block,
    /// Structured YAML format
    Yaml,
}

impl Format {
    /// Guess the format from a file extension
    #[must_use]
    #[inline]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }

    /// The format a conversion from this format produces
    #[must_use]
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Block => Self::Yaml,
            Self::Yaml => Self::Block,
        }
    }

    /// Default file extension
    #[must_use]
    #[inline]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Block => "conf",
            Self::Yaml => "yaml",
        }
    }

    /// Parse text in this format
    ///
    /// Hints only affect the block format; YAML carries its own scalar types.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is malformed
    #[inline]
    pub fn read(self, input: &str, hints: Option<&TypeHints>) -> Result<Section, AsconfigError> {
        match (self, hints) {
            (Self::Block, Some(hints)) => block::BlockReader::new().with_hints(hints).read(input),
            (Self::Block, None) => block::read(input),
            (Self::Yaml, _) => yaml::read(input),
        }
    }

    /// Render a document in this format
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails
    #[inline]
    pub fn write(self, root: &Section) -> Result<String> {
        match self {
            Self::Block => Ok(block::write(root)),
            Self::Yaml => yaml::write(root),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conf" | "asconf" | "block" => Ok(Self::Block),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!("Invalid format: {s}. Use 'conf' or 'yaml'")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "conf",
            Self::Yaml => "yaml",
        })
    }
}
