//! Compliance checks over the collected (and overridden) package list.
//!
//! Every check always runs so one failing build reports every problem at once.
//! Whether a finding blocks the run is decided afterwards by
//! [`ValidationFindings::is_failure`].

use std::collections::BTreeMap;

use crate::collector::VersionCheck;
use crate::config::{Config, Override, SeverityPolicy};
use crate::license::copyright::{copyright_of, has_copyright};
use crate::models::PackageInfo;
use crate::overrides::find_unused_overrides;
use crate::report::ErrorBundle;

const HEADER_LICENSE: &str = "The following licenses are not allowed (define a license override in the config.json to solve this issue):";
const HEADER_COPYRIGHT: &str = "The following copyrights/homepage are incorrect (define a homepage override in the config.json to solve this issue):";
const HEADER_HOMEPAGE_OVERRIDES: &str = "The following copyrights/homepage overrides are redundant (remove these unused homepage override in the config.json to solve this issue):";
const HEADER_LICENSE_OVERRIDES: &str = "The following license overrides are redundant (remove these unused license override in the config.json to solve this issue):";
const HEADER_MISSING: &str = "The following packages are missing (install missing dependencies with npm install/ci to solve this issue):";

/// Packages failing the license or copyright check.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvalidPackageContent {
    pub license: Vec<PackageInfo>,
    pub copyright: Vec<PackageInfo>,
}

/// Declared dependencies of one package that nothing installed satisfies.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingPackages {
    /// `name@version` of the declaring package.
    pub declared_by: String,
    /// Missing name → requested range.
    pub missing_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFindings {
    pub invalid_license: Vec<PackageInfo>,
    pub invalid_copyright: Vec<PackageInfo>,
    pub unused_homepage_overrides: Vec<Override>,
    pub unused_license_overrides: Vec<Override>,
    pub missing_packages: Vec<MissingPackages>,
    pub policy: SeverityPolicy,
}

/// Split out packages whose license is not allow-listed or that have no attribution.
pub fn find_invalid_package_content<F>(
    packages: &[PackageInfo],
    allowed_licenses: &[&str],
    copyright_ok: F,
) -> InvalidPackageContent
where
    F: Fn(&PackageInfo) -> bool,
{
    let license_allowed = |pkg: &PackageInfo| {
        pkg.license
            .as_deref()
            .is_some_and(|l| allowed_licenses.contains(&l))
    };

    InvalidPackageContent {
        license: packages
            .iter()
            .filter(|&p| !license_allowed(p))
            .cloned()
            .collect(),
        copyright: packages
            .iter()
            .filter(|&p| !copyright_ok(p))
            .cloned()
            .collect(),
    }
}

/// Declared dependencies (of every collected package, product included) that no
/// collected package satisfies. Only packages with at least one miss are returned.
pub fn find_missing_packages(
    packages: &[PackageInfo],
    version_check: VersionCheck,
) -> Vec<MissingPackages> {
    packages
        .iter()
        .filter_map(|pkg| {
            let missing: BTreeMap<String, String> = pkg
                .dependencies
                .iter()
                .filter(|(name, range)| {
                    !packages
                        .iter()
                        .any(|p| &p.name == *name && version_check.matches(range, &p.version))
                })
                .map(|(name, range)| (name.clone(), range.clone()))
                .collect();

            (!missing.is_empty()).then(|| MissingPackages {
                declared_by: pkg.id(),
                missing_dependencies: missing,
            })
        })
        .collect()
}

/// Run every check. Overrides must already have been applied to `packages`.
pub fn validate(
    packages: &[PackageInfo],
    config: &Config,
    policy: SeverityPolicy,
    version_check: VersionCheck,
) -> ValidationFindings {
    let unused = find_unused_overrides(packages, &config.overrides);
    let invalid = find_invalid_package_content(
        packages,
        &config.allowed_license_names(),
        has_copyright,
    );
    let missing_packages = find_missing_packages(packages, version_check);
    for m in &missing_packages {
        tracing::debug!(
            "{} declares uninstalled dependencies: {:?}",
            m.declared_by,
            m.missing_dependencies
        );
    }

    let findings = ValidationFindings {
        invalid_license: invalid.license,
        invalid_copyright: invalid.copyright,
        unused_homepage_overrides: unused.homepage,
        unused_license_overrides: unused.license,
        missing_packages,
        policy,
    };

    tracing::debug!(
        "validated {} packages: {} disallowed, {} without copyright, {}/{} unused overrides, {} with missing deps",
        packages.len(),
        findings.invalid_license.len(),
        findings.invalid_copyright.len(),
        findings.unused_homepage_overrides.len(),
        findings.unused_license_overrides.len(),
        findings.missing_packages.len()
    );

    findings
}

impl ValidationFindings {
    fn reports_homepage_overrides(&self) -> bool {
        !self.unused_homepage_overrides.is_empty()
            && self.policy.redundant_homepage_overrides.is_blocking()
    }

    fn reports_license_overrides(&self) -> bool {
        !self.unused_license_overrides.is_empty()
            && self.policy.redundant_license_overrides.is_blocking()
    }

    fn has_missing_dependencies(&self) -> bool {
        self.missing_packages
            .iter()
            .any(|m| !m.missing_dependencies.is_empty())
    }

    /// Does any gate-contributing category hold a finding?
    pub fn is_failure(&self) -> bool {
        !self.invalid_license.is_empty()
            || !self.invalid_copyright.is_empty()
            || self.reports_homepage_overrides()
            || self.reports_license_overrides()
            || self.has_missing_dependencies()
    }

    /// One block per gate-contributing category with findings. Suppressed
    /// categories are left out entirely.
    pub fn error_bundle(&self) -> ErrorBundle {
        let mut bundle = ErrorBundle::default();

        if !self.invalid_license.is_empty() {
            bundle.header(HEADER_LICENSE);
            for p in &self.invalid_license {
                bundle.line(format!(
                    "{} | license: {} | {}",
                    p.id(),
                    p.license.as_deref().unwrap_or("none"),
                    manifest_of(p)
                ));
            }
        }

        if !self.invalid_copyright.is_empty() {
            bundle.header(HEADER_COPYRIGHT);
            for p in &self.invalid_copyright {
                bundle.line(format!(
                    "{} | copyright: {} | {}",
                    p.id(),
                    copyright_of(p).as_deref().unwrap_or("none"),
                    manifest_of(p)
                ));
            }
        }

        if self.reports_homepage_overrides() {
            bundle.header(HEADER_HOMEPAGE_OVERRIDES);
            for o in &self.unused_homepage_overrides {
                bundle.line(o.id());
            }
        }

        if self.reports_license_overrides() {
            bundle.header(HEADER_LICENSE_OVERRIDES);
            for o in &self.unused_license_overrides {
                bundle.line(o.id());
            }
        }

        if self.has_missing_dependencies() {
            bundle.header(HEADER_MISSING);
            for m in &self.missing_packages {
                for (name, range) in &m.missing_dependencies {
                    bundle.line(format!("{}@{}", name, range));
                }
            }
        }

        bundle
    }
}

fn manifest_of(pkg: &PackageInfo) -> String {
    pkg.first_manifest()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
