//! Dependency tree walk over installed `node_modules` directories.
//!
//! Starting from the product's `package.json`, every runtime dependency is
//! resolved the way Node does it (nearest `node_modules` first, walking up the
//! directory tree), followed by the explicitly configured `node_modules`
//! roots. The resulting list holds one [`PackageInfo`] per `name@version`,
//! with the product entry appended last.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::{PrintrError, Result};
use crate::models::{Collection, InvalidPackage, PackageInfo, PackageKind};

pub mod manifest;
pub mod version;

use manifest::{read_package_json, ManifestError};
pub use version::VersionCheck;

/// Walk the installed tree below `manifest` and collect one entry per resolved package.
///
/// A product manifest that cannot be read is fatal; broken dependency manifests
/// are recorded in [`Collection::invalid_packages`] and skipped.
pub fn collect_package_infos(
    manifest: &Path,
    node_modules_paths: &[PathBuf],
    version_check: VersionCheck,
) -> Result<Collection> {
    let product = read_package_json(manifest, PackageKind::Product).map_err(|e| match e {
        ManifestError::Io(source) => PrintrError::ManifestRead {
            path: manifest.to_path_buf(),
            source,
        },
        ManifestError::Json(source) => PrintrError::ManifestParse {
            path: manifest.to_path_buf(),
            source,
        },
    })?;

    let product_dir = manifest.parent().unwrap_or_else(|| Path::new(""));

    let mut walker = TreeWalker {
        node_modules_paths,
        version_check,
        collection: Collection::default(),
        index: HashMap::new(),
        visited: HashSet::new(),
        reported: HashSet::new(),
    };
    walker.walk(product_dir, &product.dependencies);

    let mut collection = walker.collection;
    tracing::debug!(
        "collected {} packages ({} unparsable manifests) for {}",
        collection.packages.len(),
        collection.invalid_packages.len(),
        product.id()
    );
    collection.packages.push(product);

    Ok(collection)
}

struct TreeWalker<'a> {
    node_modules_paths: &'a [PathBuf],
    version_check: VersionCheck,
    collection: Collection,
    /// `name@version` → position in `collection.packages`.
    index: HashMap<String, usize>,
    /// Package directories already expanded.
    visited: HashSet<PathBuf>,
    /// Invalid manifests already recorded.
    reported: HashSet<PathBuf>,
}

impl TreeWalker<'_> {
    fn walk(&mut self, root: &Path, root_deps: &BTreeMap<String, String>) {
        let mut queue: VecDeque<(PathBuf, BTreeMap<String, String>)> = VecDeque::new();
        queue.push_back((root.to_path_buf(), root_deps.clone()));

        while let Some((dir, deps)) = queue.pop_front() {
            for (name, range) in &deps {
                let Some((pkg_dir, pkg)) = self.resolve(&dir, name, range) else {
                    tracing::debug!("{}@{} not installed below {}", name, range, dir.display());
                    continue;
                };

                if !self.visited.insert(pkg_dir.clone()) {
                    continue;
                }

                let id = pkg.id();
                match self.index.get(&id) {
                    Some(&i) => {
                        let existing = &mut self.collection.packages[i];
                        for path in pkg.package_json_paths {
                            if !existing.package_json_paths.contains(&path) {
                                existing.package_json_paths.push(path);
                            }
                        }
                    }
                    None => {
                        self.index.insert(id, self.collection.packages.len());
                        self.collection.packages.push(pkg.clone());
                    }
                }

                // Each install location can carry its own nested node_modules
                queue.push_back((pkg_dir, pkg.dependencies));
            }
        }
    }

    /// Pick the installed copy of `name` visible from `from`.
    ///
    /// The first candidate whose version satisfies `range` wins; otherwise the
    /// first parsable candidate is used and the missing-package check reports
    /// the mismatch later.
    fn resolve(&mut self, from: &Path, name: &str, range: &str) -> Option<(PathBuf, PackageInfo)> {
        let mut fallback = None;

        for dir in self.candidate_dirs(from, name) {
            let manifest = dir.join("package.json");
            match read_package_json(&manifest, PackageKind::Dependency) {
                Ok(pkg) => {
                    if self.version_check.matches(range, &pkg.version) {
                        return Some((dir, pkg));
                    }
                    if fallback.is_none() {
                        fallback = Some((dir, pkg));
                    }
                }
                Err(e) => {
                    tracing::debug!("skipping {}: {}", manifest.display(), e);
                    if self.reported.insert(manifest.clone()) {
                        self.collection.invalid_packages.push(InvalidPackage {
                            package_file_path: manifest,
                        });
                    }
                }
            }
        }

        fallback
    }

    /// Existing package directories for `name`, nearest first.
    fn candidate_dirs(&self, from: &Path, name: &str) -> Vec<PathBuf> {
        let nested = from
            .ancestors()
            // node never looks inside node_modules/node_modules
            .filter(|a| a.file_name().map_or(true, |f| f != "node_modules"))
            .map(|a| a.join("node_modules").join(name));

        let configured = self.node_modules_paths.iter().map(|p| p.join(name));

        let mut seen = HashSet::new();
        nested
            .chain(configured)
            .filter(|dir| dir.join("package.json").is_file())
            .filter(|dir| seen.insert(dir.clone()))
            .collect()
    }
}
