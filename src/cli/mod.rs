//! Command-line interface module
//!
//! Handles argument parsing and maps each subcommand onto its operation

pub mod args;

pub use args::*;
