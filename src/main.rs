//! # asconfig
//!
//! `asconfig` manages Aerospike server configuration files.
//!
//! ## Features
//! - Convert between the block format (`aerospike.conf`) and YAML, in both directions.
//! - Validate a configuration against the JSON schema of its server version.
//! - Generate a configuration from a server snapshot.
//! - Diff two configuration files, or the schemas of two server versions.
//!
//! ## Usage
//!
//! ```sh
//! asconfig convert aerospike.conf -a 7.0.0 -o aerospike.yaml
//! asconfig validate aerospike.yaml
//! asconfig diff files old.conf new.yaml
//! asconfig diff versions 6.4.0 7.0.0 --verbose
//! ```
//!
//! See `asconfig --help` for every option.

use asconfig::cli::Args;
use asconfig::error::AsconfigError;
use asconfig::system::RealSystem;
use clap::Parser as _;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    match asconfig::run(args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            let known = err.downcast_ref::<AsconfigError>();
            match known {
                Some(AsconfigError::Validation { report }) => {
                    error!("Validation failed with {} issue(s)", report.len());
                }
                Some(findings @ AsconfigError::DiffFindings { .. }) => info!("{findings}"),
                _ => error!("{err:#}"),
            }
            std::process::exit(known.map_or(1, AsconfigError::exit_code));
        }
    }
}
