//! Custom error types with exit codes

use crate::schema::validation::ValidationReport;
use thiserror::Error;

/// Main error type for asconfig operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AsconfigError {
    /// Parse Error - malformed configuration text
    #[error("Parse error{}: {message}", location(.line, .column))]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Normalization Error - the document reached a state no pass can resolve
    #[error("Normalization error: {message}")]
    Normalization { message: String },

    /// Schema Error - malformed schema or unsupported server version
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Validation Error - the document does not satisfy its schema
    #[error("Validation failed:\n{report}")]
    Validation { report: ValidationReport },

    /// Diff Findings - the compared inputs differ
    #[error("Found {count} difference(s)")]
    DiffFindings { count: usize },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

/// `" at line L, column C"`, or nothing when the position is unknown
fn location(line: &usize, column: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {line}, column {column}")
    }
}

impl AsconfigError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Parse { .. } => 1,
            Self::Normalization { .. } => 2,
            Self::Schema { .. } => 3,
            Self::Validation { .. } => 4,
            Self::DiffFindings { .. } => 5,
            Self::Filesystem { .. } => 6,
        }
    }

    /// Create a parse error at a 1-based position
    #[inline]
    pub fn parse<S: Into<String>>(line: usize, column: usize, message: S) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error without a known position
    #[inline]
    pub fn parse_unlocated<S: Into<String>>(message: S) -> Self {
        Self::parse(0, 0, message)
    }

    /// Create a normalization error
    #[inline]
    pub fn normalization<S: Into<String>>(message: S) -> Self {
        Self::Normalization {
            message: message.into(),
        }
    }

    /// Create a schema error
    #[inline]
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
