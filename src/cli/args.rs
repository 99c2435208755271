use crate::format::Format;
use crate::operations::{
    ConvertOptions, DiffFilesOptions, DiffVersionsOptions, GenerateOptions, ValidateOptions,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Directory under the user data dir holding `<version>.json` schemas
const SCHEMA_SUBDIR: &str = "asconfig/schemas";

/// Command-line arguments for asconfig
#[derive(Parser, Debug, Clone)]
#[command(name = "asconfig")]
#[command(about = "Convert, validate, generate and diff Aerospike configuration files")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Directory of <version>.json configuration schemas
    #[arg(long, value_name = "DIR", env = "ASCONFIG_SCHEMA_DIR", global = true)]
    pub schema_dir: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL", env = "ASCONFIG_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Schema directory from the flag or environment, else the per-user default
    #[must_use]
    #[inline]
    pub fn schema_dir(&self) -> PathBuf {
        self.schema_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(SCHEMA_SUBDIR)
        })
    }

    /// Log filter used when `RUST_LOG` is not set
    #[must_use]
    #[inline]
    pub fn log_filter(&self) -> String {
        match (&self.log_level, self.verbose) {
            (Some(level), _) => level.to_lowercase(),
            (None, true) => "debug".to_owned(),
            (None, false) => "info".to_owned(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert between the block (.conf) and YAML formats
    Convert(ConvertArgs),

    /// Validate a configuration file against its server version's schema
    Validate(ValidateArgs),

    /// Compare configuration files or schema versions
    #[command(subcommand)]
    Diff(DiffCommand),

    /// Generate a configuration file from a server snapshot
    Generate(GenerateArgs),

    /// List the server versions with a schema
    Versions,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DiffCommand {
    /// Compare two configuration files key by key
    Files(DiffFilesArgs),

    /// Compare the schemas of two server versions
    Versions(DiffVersionsArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Configuration file to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file or directory (stdout when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Input format: conf or yaml (detected from the extension when omitted)
    #[arg(short = 'F', long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Aerospike server version the file targets
    #[arg(short = 'a', long, value_name = "VERSION")]
    pub aerospike_version: Option<String>,

    /// Skip validation and accept an unknown server version
    #[arg(long)]
    pub force: bool,
}

impl ConvertArgs {
    #[must_use]
    #[inline]
    pub fn into_options(self, schema_dir: PathBuf) -> ConvertOptions {
        ConvertOptions {
            input: self.input,
            output: self.output,
            format: self.format,
            server_version: self.aerospike_version,
            force: self.force,
            schema_dir,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format: conf or yaml (detected from the extension when omitted)
    #[arg(short = 'F', long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Aerospike server version the file targets
    #[arg(short = 'a', long, value_name = "VERSION")]
    pub aerospike_version: Option<String>,
}

impl ValidateArgs {
    #[must_use]
    #[inline]
    pub fn into_options(self, schema_dir: PathBuf) -> ValidateOptions {
        ValidateOptions {
            input: self.input,
            format: self.format,
            server_version: self.aerospike_version,
            schema_dir,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct DiffFilesArgs {
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Format of both files (detected per file when omitted)
    #[arg(short = 'F', long, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Server version used to type block-format values
    #[arg(short = 'a', long, value_name = "VERSION")]
    pub aerospike_version: Option<String>,
}

impl DiffFilesArgs {
    #[must_use]
    #[inline]
    pub fn into_options(self, schema_dir: PathBuf) -> DiffFilesOptions {
        DiffFilesOptions {
            left: self.left,
            right: self.right,
            format: self.format,
            server_version: self.aerospike_version,
            schema_dir,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct DiffVersionsArgs {
    /// Older server version
    #[arg(value_name = "OLD")]
    pub old: String,

    /// Newer server version
    #[arg(value_name = "NEW")]
    pub new: String,

    /// Show type, default and edition details of each change
    #[arg(long)]
    pub verbose: bool,

    /// Only report changes at or below this dotted path
    #[arg(long, value_name = "PATH")]
    pub filter_path: Option<String>,
}

impl DiffVersionsArgs {
    #[must_use]
    #[inline]
    pub fn into_options(self, schema_dir: PathBuf) -> DiffVersionsOptions {
        DiffVersionsOptions {
            old: self.old,
            new: self.new,
            schema_dir,
            filter_path: self.filter_path,
            verbose: self.verbose,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Server snapshot (JSON) to describe
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Output file or directory (stdout when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format: conf or yaml
    #[arg(short = 'F', long, value_name = "FORMAT", default_value = "yaml")]
    pub format: Format,

    /// Aerospike server version (defaults to the snapshot's build)
    #[arg(short = 'a', long, value_name = "VERSION")]
    pub aerospike_version: Option<String>,

    /// Skip validation and accept an unknown server version
    #[arg(long)]
    pub force: bool,
}

impl GenerateArgs {
    #[must_use]
    #[inline]
    pub fn into_options(self, schema_dir: PathBuf) -> GenerateOptions {
        GenerateOptions {
            snapshot: self.snapshot,
            output: self.output,
            format: self.format,
            server_version: self.aerospike_version,
            force: self.force,
            schema_dir,
        }
    }
}
