//! One complete run: collect → override → validate → assemble.

use std::path::{Path, PathBuf};

use crate::assembler::{assemble, AssemblyOptions, OutputFormat};
use crate::collector::{collect_package_infos, VersionCheck};
use crate::config::{load_config, SeverityPolicy};
use crate::error::Result;
use crate::license::text::LicenseEncoding;
use crate::overrides::apply_overrides;
use crate::report::RunResult;
use crate::validator::validate;

/// Everything one run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The product's `package.json`.
    pub manifest: PathBuf,
    /// Extra `node_modules` roots searched after Node's own lookup.
    pub node_modules_paths: Vec<PathBuf>,
    pub license_files_dir: PathBuf,
    /// Explicit config path; discovered next to the manifest when absent.
    pub config: Option<PathBuf>,
    pub template: PathBuf,
    pub version_check: VersionCheck,
    pub encoding: LicenseEncoding,
    pub severity: SeverityPolicy,
    pub format: OutputFormat,
}

/// Run the compliance gate and, if it passes, render the document.
///
/// Compliance problems come back as [`RunResult::Error`]; only operational
/// failures (unreadable inputs, template errors) are `Err`.
pub fn run(options: &RunOptions) -> Result<RunResult> {
    let manifest_dir = options.manifest.parent().unwrap_or_else(|| Path::new(""));
    let config = load_config(manifest_dir, options.config.as_deref())?;

    let collection = collect_package_infos(
        &options.manifest,
        &options.node_modules_paths,
        options.version_check,
    )?;
    let mut packages = collection.packages;

    apply_overrides(&mut packages, &config.overrides);

    let findings = validate(&packages, &config, options.severity, options.version_check);
    if findings.is_failure() {
        return Ok(RunResult::Error(findings.error_bundle()));
    }

    let document = assemble(
        &packages,
        &collection.invalid_packages,
        &config,
        &AssemblyOptions {
            license_files_dir: &options.license_files_dir,
            encoding: options.encoding,
            template: &options.template,
            format: options.format,
        },
    )?;

    Ok(RunResult::Document(document))
}
