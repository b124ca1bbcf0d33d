//! Configuration for the `panimg-models` command line tool.
//!
//! Options can be given as arguments or through environment variables with
//! the `PANIMG_` prefix:
//!
//! - `PANIMG_OUTPUT` - Where `merge` writes its result (default: stdout)
//! - `PANIMG_PRETTY` - Pretty-print JSON output (default: false)
//! - `PANIMG_STRICT` - Make `check` fail on any per-file error (default: false)
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use panimg_models::config::{Cli, Command};
//!
//! match Cli::parse().into_command() {
//!     Command::Merge(config) => println!("merging {} file(s)", config.inputs.len()),
//!     Command::Check(config) => println!("checking {}", config.input.display()),
//!     Command::InferColorSpace(config) => println!("{}", config.components),
//! }
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Default Values
// =============================================================================

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "panimg_models=info";

/// Log filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "panimg_models=debug";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Inspect and combine image ingestion results.
#[derive(Parser, Debug, Clone)]
#[command(name = "panimg-models")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merge several result documents into one.
    Merge(MergeConfig),

    /// Summarize a result document and check its integrity.
    Check(CheckConfig),

    /// Print the color space for a pixel component count.
    InferColorSpace(InferConfig),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Merge(config) => config.verbose,
            Command::Check(config) => config.verbose,
            Command::InferColorSpace(config) => config.verbose,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MergeConfig {
    /// Result documents (JSON), merged in the given order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the merged result here instead of stdout.
    #[arg(short, long, env = "PANIMG_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false, env = "PANIMG_PRETTY")]
    pub pretty: bool,

    /// Fail if the merged result has integrity issues.
    #[arg(long = "check", default_value_t = false)]
    pub check_integrity: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl MergeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.is_empty() {
            return Err("At least one input document is required".to_string());
        }

        if let Some(ref output) = self.output {
            if self.inputs.contains(output) {
                return Err(format!(
                    "Output {} would overwrite one of the inputs",
                    output.display()
                ));
            }
        }

        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// Result document (JSON) to check.
    pub input: PathBuf,

    /// Also fail when any input has recorded errors.
    #[arg(long, default_value_t = false, env = "PANIMG_STRICT")]
    pub strict: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InferConfig {
    /// Number of components per pixel.
    pub components: u32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
