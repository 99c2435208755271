//! The block format used by `aerospike.conf`
//!
//! Line oriented: `KEY VALUES…` assignments, `KEY [ID] {` openers and `}`
//! closers, with `#` comments.

pub mod lexer;
pub mod reader;
pub mod writer;

pub use reader::{BlockReader, read};
pub use writer::{BlockWriter, write};
