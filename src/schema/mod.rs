//! Schema handling
//!
//! Holds the per-version schema registry, schema-derived scalar type hints
//! and validation of canonical documents.

pub mod hints;
pub mod registry;
pub mod validation;

pub use hints::{ScalarType, TypeHints};
pub use registry::{SchemaRegistry, Version};
pub use validation::{JsonSchemaValidator, ValidationIssue, ValidationReport, Validator};
