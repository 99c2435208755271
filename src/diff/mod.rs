//! Configuration and schema comparison

pub mod config;
pub mod flatten;
pub mod schema;

pub use config::{ConfigDiff, DiffEntry, diff_documents, diff_flat};
pub use flatten::{FlatMap, INDEX_SEGMENT, flatten, is_reserved};
pub use schema::{ChangeKind, SchemaChange, SchemaDiff, SchemaDiffOptions};
