//! Operations module
//!
//! Each command reads its inputs through [`System`](crate::system::System),
//! drives the core pipeline and hands back what should be printed.

pub mod convert;
pub mod diff;
pub mod generate;
pub mod io;
pub mod schemas;
pub mod validate;

pub use convert::{ConvertOperation, ConvertOptions};
pub use diff::{DiffFilesOperation, DiffFilesOptions, DiffVersionsOperation, DiffVersionsOptions};
pub use generate::{GenerateOperation, GenerateOptions};
pub use validate::{ValidateOperation, ValidateOptions};
