//! panimg-models - inspect and combine image ingestion results.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panimg_models::{
    config::{
        CheckConfig, Cli, Command, InferConfig, MergeConfig, DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER,
    },
    document::{read_and_merge, read_result, to_json, write_result},
    ColorSpace,
};

fn main() -> ExitCode {
    let command = Cli::parse().into_command();
    init_logging(command.verbose());

    match command {
        Command::Merge(config) => run_merge(config),
        Command::Check(config) => run_check(config),
        Command::InferColorSpace(config) => run_infer(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Merge Command
// =============================================================================

fn run_merge(config: MergeConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let merged = match read_and_merge(&config.inputs) {
        Ok(merged) => merged,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Merged {} document(s): {}", config.inputs.len(), merged.summary());

    if config.check_integrity {
        if let Err(e) = merged.validate() {
            error!("{}", e);
            for issue in &e.issues {
                error!("  {}", issue);
            }
            return ExitCode::FAILURE;
        }
    }

    match config.output {
        Some(ref output) => {
            if let Err(e) = write_result(output, &merged, config.pretty) {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
            info!("Wrote {}", output.display());
        }
        None => match to_json(&merged, config.pretty) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Check Command
// =============================================================================

fn run_check(config: CheckConfig) -> ExitCode {
    let result = match read_result(&config.input) {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Result: {}", config.input.display());
    println!("═════════════════════════════════");
    println!("{}", result.summary());

    if !result.file_errors.is_empty() {
        println!();
        println!("Per-file errors:");
        for (path, messages) in &result.file_errors {
            let consumed = if result.consumed_files.contains(path) {
                " (consumed)"
            } else {
                ""
            };
            println!("  {}{}", path.display(), consumed);
            for message in messages {
                println!("    - {}", message);
            }
        }
    }

    let issues = result.integrity_issues();
    println!();
    if issues.is_empty() {
        println!("✓ Integrity check passed");
    } else {
        println!("✗ {} integrity issue(s):", issues.len());
        for issue in &issues {
            println!("  {}", issue);
        }
        return ExitCode::FAILURE;
    }

    if config.strict && !result.file_errors.is_empty() {
        println!("✗ {} input(s) have errors (--strict)", result.file_errors.len());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Infer Command
// =============================================================================

fn run_infer(config: InferConfig) -> ExitCode {
    match ColorSpace::from_components(config.components) {
        Ok(color_space) => {
            println!("{}", color_space);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
