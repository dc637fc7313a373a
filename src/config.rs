use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PrintrError, Result};
use crate::models::{Author, PackageInfo};

/// Root configuration, deserialized from `config.json` (or a `.toml` equivalent).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Per-package field replacements, applied before validation.
    #[serde(default)]
    pub overrides: Overrides,
    /// The allow-list. A package whose license is not named here fails validation.
    pub licenses: Vec<LicenseEntry>,
}

impl Config {
    pub fn allowed_license_names(&self) -> Vec<&str> {
        self.licenses.iter().map(|l| l.name.as_str()).collect()
    }
}

/// The two independent override categories.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Overrides {
    /// Fixes for missing or wrong copyright attribution.
    #[serde(default)]
    pub homepage: Vec<Override>,
    /// Relabels a package's declared license.
    #[serde(default)]
    pub license: Vec<Override>,
}

/// A replacement for one package's fields, keyed by exact `name@version`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Override {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl Override {
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    pub fn matches(&self, pkg: &PackageInfo) -> bool {
        self.name == pkg.name && self.version == pkg.version
    }
}

/// An allow-listed license and, optionally, the file holding its text.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseEntry {
    pub name: String,
    /// Relative to the license-files directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Whether a category of findings blocks the run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error,
    /// Still computed, but neither gates nor appears in the error report.
    Suppress,
}

impl Severity {
    pub fn is_blocking(self) -> bool {
        self == Severity::Error
    }
}

/// Severity of the two override-redundancy categories. The other checks always block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeverityPolicy {
    pub redundant_homepage_overrides: Severity,
    pub redundant_license_overrides: Severity,
}

const CONFIG_DIR: &str = ".license-printr";
const CONFIG_FILE: &str = "config.json";

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<manifest_dir>/.license-printr/config.json`
/// 3. `~/.config/license-printr/config.json`
///
/// Unlike a scan policy there is no sensible built-in allow-list, so finding
/// nothing is an error.
pub fn load_config(manifest_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let mut searched = Vec::new();

    let project_config = manifest_dir.join(CONFIG_DIR).join(CONFIG_FILE);
    if project_config.exists() {
        return read_config(&project_config);
    }
    searched.push(project_config);

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-printr")
            .join(CONFIG_FILE);
        if home_config.exists() {
            return read_config(&home_config);
        }
        searched.push(home_config);
    }

    Err(PrintrError::ConfigNotFound {
        searched: searched
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Parse a config file; `.toml` files are read as TOML, anything else as JSON.
fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| PrintrError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed: std::result::Result<Config, String> = if is_toml {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    let config: Config = parsed.map_err(|message| PrintrError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::debug!(
        "loaded config {} ({} allow-listed licenses, {} homepage / {} license overrides)",
        path.display(),
        config.licenses.len(),
        config.overrides.homepage.len(),
        config.overrides.license.len()
    );

    Ok(config)
}
