use crate::config::{Override, Overrides};
use crate::models::PackageInfo;

/// Overrides that matched no collected package, per category.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UnusedOverrides {
    pub homepage: Vec<Override>,
    pub license: Vec<Override>,
}

/// Relabel matching packages in place.
///
/// A license override replaces `license`. A homepage override replaces
/// `homepage` and sets `author` to the override's author (clearing it when the
/// override has none), so the override becomes the displayed copyright.
pub fn apply_overrides(packages: &mut [PackageInfo], overrides: &Overrides) {
    for pkg in packages.iter_mut() {
        for o in &overrides.license {
            if !o.matches(pkg) {
                continue;
            }
            if let Some(license) = &o.license {
                tracing::debug!(
                    "license override {}: {:?} -> {}",
                    pkg.id(),
                    pkg.license,
                    license
                );
                pkg.license = Some(license.clone());
            }
        }

        for o in &overrides.homepage {
            if !o.matches(pkg) {
                continue;
            }
            tracing::debug!("homepage override {}", pkg.id());
            pkg.author = o.author.clone();
            if let Some(homepage) = &o.homepage {
                pkg.homepage = Some(homepage.clone());
            }
        }
    }
}

/// Overrides whose `name@version` matches no collected package.
pub fn find_unused_overrides(packages: &[PackageInfo], overrides: &Overrides) -> UnusedOverrides {
    let unused = |list: &[Override]| -> Vec<Override> {
        list.iter()
            .filter(|o| !packages.iter().any(|p| o.matches(p)))
            .cloned()
            .collect()
    };

    UnusedOverrides {
        homepage: unused(&overrides.homepage),
        license: unused(&overrides.license),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::copyright::copyright_of;
    use crate::models::fixtures::package;
    use crate::models::Author;

    fn license_override(name: &str, version: &str, license: &str) -> Override {
        Override {
            name: name.to_string(),
            version: version.to_string(),
            license: Some(license.to_string()),
            homepage: None,
            author: None,
        }
    }

    fn homepage_override(name: &str, version: &str, homepage: &str) -> Override {
        Override {
            name: name.to_string(),
            version: version.to_string(),
            license: None,
            homepage: Some(homepage.to_string()),
            author: None,
        }
    }

    #[test]
    fn test_license_override_applies_to_exact_version_only() {
        let mut packages = vec![package("dual", "1.0.0"), package("dual", "2.0.0")];
        packages[0].license = Some("(MIT OR GPL-3.0)".to_string());
        packages[1].license = Some("(MIT OR GPL-3.0)".to_string());

        let overrides = Overrides {
            homepage: vec![],
            license: vec![license_override("dual", "1.0.0", "MIT")],
        };
        apply_overrides(&mut packages, &overrides);

        assert_eq!(packages[0].license.as_deref(), Some("MIT"));
        assert_eq!(packages[1].license.as_deref(), Some("(MIT OR GPL-3.0)"));
    }

    #[test]
    fn test_homepage_override_becomes_copyright() {
        let mut packages = vec![package("anon", "0.3.0")];
        packages[0].author = Some(Author::Person {
            name: None,
            email: Some("x@example.com".to_string()),
            url: None,
        });
        assert_eq!(copyright_of(&packages[0]), None);

        let overrides = Overrides {
            homepage: vec![homepage_override("anon", "0.3.0", "https://anon.dev")],
            license: vec![],
        };
        apply_overrides(&mut packages, &overrides);

        assert_eq!(packages[0].author, None);
        assert_eq!(copyright_of(&packages[0]).as_deref(), Some("https://anon.dev"));
    }

    #[test]
    fn test_find_unused_overrides_per_category() {
        let packages = vec![package("used", "1.0.0")];
        let overrides = Overrides {
            homepage: vec![
                homepage_override("used", "1.0.0", "https://used.dev"),
                homepage_override("gone", "1.0.0", "https://gone.dev"),
            ],
            license: vec![
                license_override("used", "2.0.0", "MIT"),
                license_override("used", "1.0.0", "MIT"),
            ],
        };

        let unused = find_unused_overrides(&packages, &overrides);
        assert_eq!(
            unused.homepage.iter().map(Override::id).collect::<Vec<_>>(),
            vec!["gone@1.0.0"]
        );
        assert_eq!(
            unused.license.iter().map(Override::id).collect::<Vec<_>>(),
            vec!["used@2.0.0"]
        );
    }
}
