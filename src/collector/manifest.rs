use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::models::{Author, PackageInfo, PackageKind, Repository};

/// Why a package.json could not be turned into a [`PackageInfo`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Read and parse one `package.json`.
pub fn read_package_json(path: &Path, kind: PackageKind) -> Result<PackageInfo, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&content)?;
    Ok(package_from_json(&json, path, kind))
}

fn package_from_json(json: &Value, path: &Path, kind: PackageKind) -> PackageInfo {
    let name = json
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("*")
        .to_string();

    let version = json
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or("*")
        .to_string();

    PackageInfo {
        name,
        version,
        license: read_license(json),
        // Odd shapes (arrays, numbers) are treated as absent rather than failing the package
        author: json
            .get("author")
            .and_then(|v| serde_json::from_value::<Author>(v.clone()).ok()),
        homepage: json
            .get("homepage")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        repository: json
            .get("repository")
            .and_then(|v| serde_json::from_value::<Repository>(v.clone()).ok()),
        package_json_paths: vec![path.to_path_buf()],
        dependencies: read_dependencies(json),
        kind,
    }
}

/// Resolve the declared license from the three shapes seen in the wild:
///
/// - `"license": "MIT"`
/// - `"license": { "type": "MIT", "url": ... }` (deprecated)
/// - `"licenses": [{ "type": "MIT" }, { "type": "Apache-2.0" }]` (deprecated)
fn read_license(json: &Value) -> Option<String> {
    match json.get("license") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(o)) => {
            if let Some(t) = o.get("type").and_then(|v| v.as_str()) {
                return Some(t.to_string());
            }
        }
        _ => {}
    }

    let types: Vec<&str> = json
        .get("licenses")
        .and_then(|v| v.as_array())?
        .iter()
        .filter_map(|l| l.get("type").and_then(|t| t.as_str()).or_else(|| l.as_str()))
        .collect();

    match types.as_slice() {
        [] => None,
        [single] => Some(single.to_string()),
        many => Some(format!("({})", many.join(" OR "))),
    }
}

/// Runtime `dependencies` only; dev dependencies are not shipped with the product.
fn read_dependencies(json: &Value) -> BTreeMap<String, String> {
    json.get("dependencies")
        .and_then(|v| v.as_object())
        .map(|deps| {
            deps.iter()
                .map(|(name, range)| {
                    (name.clone(), range.as_str().unwrap_or("*").to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}
