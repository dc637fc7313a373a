use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One resolved npm package (distinct by `name@version`), or the product itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub license: Option<String>,
    pub author: Option<Author>,
    pub homepage: Option<String>,
    pub repository: Option<Repository>,
    /// Every manifest this `name@version` was found at, in discovery order.
    pub package_json_paths: Vec<PathBuf>,
    /// Declared runtime dependencies: name → requested range.
    pub dependencies: BTreeMap<String, String>,
    pub kind: PackageKind,
}

impl PackageInfo {
    /// The `name@version` key used by overrides and error reports.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    pub fn first_manifest(&self) -> Option<&Path> {
        self.package_json_paths.first().map(PathBuf::as_path)
    }

    pub fn is_product(&self) -> bool {
        self.kind == PackageKind::Product
    }
}

/// Marks the product's own entry so it can be pruned by content rather than position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Product,
    Dependency,
}

/// The `author` field of a package.json: `"Jane <jane@x.io>"` or `{ "name": "Jane", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Plain(String),
    Person {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Author {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Author::Plain(s) => Some(s.as_str()),
            Author::Person { name, .. } => name.as_deref(),
        }
    }
}

/// The `repository` field of a package.json: a shorthand string or `{ "type": "git", "url": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Plain(String),
    Detailed {
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Repository {
    pub fn url(&self) -> Option<&str> {
        match self {
            Repository::Plain(s) => Some(s.as_str()),
            Repository::Detailed { url, .. } => url.as_deref(),
        }
    }
}

/// A dependency manifest that could not be read or parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidPackage {
    pub package_file_path: PathBuf,
}

impl InvalidPackage {
    pub fn warning(&self) -> String {
        format!(
            "Could not parse the following package: \"{}\" (package is ignored)",
            self.package_file_path.display()
        )
    }
}

/// Output of the dependency tree walk.
#[derive(Debug, Default)]
pub struct Collection {
    /// Resolved packages; the product entry is appended last.
    pub packages: Vec<PackageInfo>,
    pub invalid_packages: Vec<InvalidPackage>,
}
