//! `asconfig` - A CLI tool for managing Aerospike configuration files
//!
//! This library converts between the block (`aerospike.conf`) and YAML
//! formats, validates documents against per-version JSON schemas, generates
//! configurations from server snapshots, and diffs configurations and
//! schema versions.

pub mod cli;
pub mod diff;
pub mod error;
pub mod format;
pub mod generate;
pub mod model;
pub mod normalize;
pub mod operations;
pub mod schema;
pub mod system;

use anyhow::Result;
use cli::{Args, Command, DiffCommand};
use error::AsconfigError;
use operations::schemas;
use operations::{
    ConvertOperation, DiffFilesOperation, DiffVersionsOperation, GenerateOperation,
    ValidateOperation,
};
use system::System;

/// Main entry point for the asconfig library
///
/// Reports go to stdout. Differences and validation issues are returned as
/// [`AsconfigError`] after their report has been printed.
///
/// # Errors
///
/// Returns an error if the command fails or finds differences
#[inline]
pub fn run(args: Args, system: &dyn System) -> Result<()> {
    let schema_dir = args.schema_dir();
    match args.command {
        Command::Convert(convert) => {
            let operation = ConvertOperation::new(convert.into_options(schema_dir), system);
            if let Some(text) = operation.execute()? {
                print!("{text}");
            }
            Ok(())
        }
        Command::Validate(validate) => {
            let operation = ValidateOperation::new(validate.into_options(schema_dir), system);
            let report = operation.execute()?;
            if !report.is_empty() {
                print!("{report}");
            }
            report.into_result()?;
            Ok(())
        }
        Command::Diff(DiffCommand::Files(files)) => {
            let diff = DiffFilesOperation::new(files.into_options(schema_dir), system).execute()?;
            if diff.is_empty() {
                return Ok(());
            }
            print!("{}", diff.render());
            Err(AsconfigError::DiffFindings { count: diff.len() }.into())
        }
        Command::Diff(DiffCommand::Versions(versions)) => {
            let diff =
                DiffVersionsOperation::new(versions.into_options(schema_dir), system).execute()?;
            print!("{}", diff.render());
            if diff.is_empty() {
                return Ok(());
            }
            Err(AsconfigError::DiffFindings {
                count: diff.changes().len(),
            }
            .into())
        }
        Command::Generate(generate) => {
            let operation = GenerateOperation::new(generate.into_options(schema_dir), system);
            if let Some(text) = operation.execute()? {
                print!("{text}");
            }
            Ok(())
        }
        Command::Versions => {
            for version in schemas::versions(system, &schema_dir)? {
                println!("{version}");
            }
            Ok(())
        }
    }
}
