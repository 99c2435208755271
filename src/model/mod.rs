//! Document model
//!
//! A configuration is a root [`Section`]: an insertion-ordered map whose
//! values are scalars, lists of scalars, nested sections or lists of
//! sections. The model knows nothing about either textual format.

pub mod scalar;
pub mod value;

pub use scalar::Scalar;
pub use value::{NAME_KEY, Section, TYPE_KEY, Value};
