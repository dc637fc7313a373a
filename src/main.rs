//! `license-printr` — gate a build on npm dependency licenses and print an attribution document.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the config: allow-list, overrides, license files ([`config::load_config`]).
//! 3. Walk the installed dependency tree ([`collector`]).
//! 4. Apply overrides ([`overrides`]) and run every compliance check ([`validator`]).
//! 5. On success, group packages by license and render the template ([`assembler`]).
//! 6. Report the result ([`report`]) and write the document or error log.
//! 7. Exit `0` (document written) or `1` (at least one blocking violation).

mod assembler;
mod cli;
mod collector;
mod config;
mod error;
mod license;
mod models;
mod overrides;
mod pipeline;
mod report;
mod validator;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use collector::VersionCheck;
use config::SeverityPolicy;
use pipeline::RunOptions;
use report::RunResult;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // A log from an earlier run must not be mistaken for this one's
    if let Some(log) = &cli.error_log_file {
        if log.exists() {
            std::fs::remove_file(log)
                .with_context(|| format!("failed to remove stale error log {}", log.display()))?;
        }
    }

    let options = RunOptions {
        manifest: cli.package_json.clone(),
        node_modules_paths: cli.node_modules.clone(),
        license_files_dir: cli.license_files.clone(),
        config: cli.config.clone(),
        template: cli.template.clone(),
        version_check: VersionCheck::from_disabled(cli.disable_npm_version_check),
        encoding: (&cli.license_text_modifier).into(),
        severity: SeverityPolicy {
            redundant_homepage_overrides: (&cli.error_level_redundant_homepage_overrides).into(),
            redundant_license_overrides: (&cli.error_level_redundant_license_overrides).into(),
        },
        format: (&cli.format).into(),
    };

    let result = pipeline::run(&options)
        .with_context(|| format!("license check of {} failed", cli.package_json.display()))?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&result, cli.verbose, cli.quiet),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    match &result {
        RunResult::Error(bundle) => {
            if let Some(log) = &cli.error_log_file {
                write_file(log, &bundle.to_string())?;
            }
            std::process::exit(1);
        }
        RunResult::Document(doc) => match &cli.document_file {
            Some(path) => write_file(path, &doc.document)?,
            // JSON reports already carry the document
            None if matches!(cli.report, ReportFormat::Terminal) => print!("{}", doc.document),
            None => {}
        },
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// `RUST_LOG` wins; otherwise `--verbose` → debug, `--quiet` → error, default warn.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
