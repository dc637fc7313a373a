use crate::license::text::LicenseText;
use crate::models::PackageInfo;

/// All libraries sharing one license name, plus that license's text once attached.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseSection<'a> {
    pub license_name: String,
    pub libraries: Vec<&'a PackageInfo>,
    pub license_text: Option<String>,
}

/// Group packages by exact license name, in order of first appearance.
///
/// Packages without a license are not grouped; validation rejects them before
/// a document is ever assembled.
pub fn gather_license_sections<'a, I>(packages: I) -> Vec<LicenseSection<'a>>
where
    I: IntoIterator<Item = &'a PackageInfo>,
{
    let mut sections: Vec<LicenseSection<'a>> = Vec::new();

    for pkg in packages {
        let Some(license) = pkg.license.as_deref() else {
            continue;
        };

        match sections.iter_mut().find(|s| s.license_name == license) {
            Some(section) => section.libraries.push(pkg),
            None => sections.push(LicenseSection {
                license_name: license.to_string(),
                libraries: vec![pkg],
                license_text: None,
            }),
        }
    }

    sections
}

/// Join license texts onto sections by license name. Sections without a
/// matching text keep `license_text: None`.
pub fn attach_meta<'a>(
    sections: Vec<LicenseSection<'a>>,
    texts: &[LicenseText],
) -> Vec<LicenseSection<'a>> {
    sections
        .into_iter()
        .map(|mut section| {
            section.license_text = texts
                .iter()
                .find(|t| t.license_name == section.license_name)
                .map(|t| t.text.clone());
            section
        })
        .collect()
}
