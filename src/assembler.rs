//! Turns a validated package list into the rendered attribution document.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::config::Config;
use crate::error::{PrintrError, Result};
use crate::license::copyright::copyright_of;
use crate::license::sections::{attach_meta, gather_license_sections, LicenseSection};
use crate::license::text::{load_license_texts, LicenseEncoding};
use crate::models::{InvalidPackage, PackageInfo};
use crate::report::{RenderedDocument, SectionSummary};

/// Escaping applied to `{{value}}` insertions. `{{{value}}}` is always raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text, JSON, JavaScript: values are inserted verbatim.
    #[default]
    Text,
    /// HTML: values are entity-escaped.
    Html,
}

pub struct AssemblyOptions<'a> {
    pub license_files_dir: &'a Path,
    pub encoding: LicenseEncoding,
    pub template: &'a Path,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct TemplateContext<'a> {
    licenses: Vec<TemplateLicense<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateLicense<'a> {
    index: usize,
    name: &'a str,
    license_text: &'a str,
    libraries: Vec<TemplateLibrary<'a>>,
}

#[derive(Debug, Serialize)]
struct TemplateLibrary<'a> {
    name: &'a str,
    version: &'a str,
    copyright: Option<String>,
    /// The whole package record, for templates that need more than the basics.
    data: &'a PackageInfo,
}

/// Build the document for a package list that passed validation.
///
/// The product entry is pruned, packages are grouped by license, and every
/// group whose license has no text on disk is dropped before rendering.
pub fn assemble(
    packages: &[PackageInfo],
    invalid_packages: &[InvalidPackage],
    config: &Config,
    options: &AssemblyOptions<'_>,
) -> Result<RenderedDocument> {
    let texts = load_license_texts(&config.licenses, options.license_files_dir, options.encoding)?;

    let dependencies = packages.iter().filter(|p| !p.is_product());
    let sections = attach_meta(gather_license_sections(dependencies), &texts);
    let context = template_context(&sections);

    let template = std::fs::read_to_string(options.template).map_err(|source| {
        PrintrError::TemplateRead {
            path: options.template.to_path_buf(),
            source,
        }
    })?;
    let document = render(&template, &context, options.format)?;

    let summaries = context
        .licenses
        .iter()
        .map(|l| SectionSummary {
            index: l.index,
            license: l.name.to_string(),
            libraries: l.libraries.len(),
        })
        .collect();

    Ok(RenderedDocument {
        document,
        warnings: invalid_packages.iter().map(InvalidPackage::warning).collect(),
        sections: summaries,
    })
}

/// Keep only sections with text and number them from 1.
fn template_context<'a>(sections: &'a [LicenseSection<'a>]) -> TemplateContext<'a> {
    let mut licenses = Vec::new();

    for section in sections {
        let Some(text) = section.license_text.as_deref() else {
            tracing::warn!(
                "license {} has no license text configured; dropping its section ({} libraries)",
                section.license_name,
                section.libraries.len()
            );
            continue;
        };

        licenses.push(TemplateLicense {
            index: licenses.len() + 1,
            name: &section.license_name,
            license_text: text,
            libraries: section
                .libraries
                .iter()
                .map(|&p| TemplateLibrary {
                    name: &p.name,
                    version: &p.version,
                    copyright: copyright_of(p),
                    data: p,
                })
                .collect(),
        });
    }

    TemplateContext { licenses }
}

fn render(template: &str, context: &TemplateContext<'_>, format: OutputFormat) -> Result<String> {
    let mut hb = Handlebars::new();
    if format == OutputFormat::Text {
        hb.register_escape_fn(handlebars::no_escape);
    }
    Ok(hb.render_template(template, context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LicenseEntry;
    use crate::models::fixtures::{package, product};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TEMPLATE: &str = "{{#each licenses}}{{index}}. {{name}}\n{{#each libraries}}- {{name}}@{{version}} ({{copyright}})\n{{/each}}{{licenseText}}{{/each}}";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(template: &str) -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::create_dir(dir.path().join("licenses")).unwrap();
            std::fs::write(dir.path().join("template.hbs"), template).unwrap();
            Fixture { dir }
        }

        fn license_file(&self, file: &str, text: &str) {
            std::fs::write(self.dir.path().join("licenses").join(file), text).unwrap();
        }

        fn assemble(
            &self,
            packages: &[PackageInfo],
            licenses: Vec<LicenseEntry>,
            encoding: LicenseEncoding,
            format: OutputFormat,
        ) -> Result<RenderedDocument> {
            let config = Config {
                overrides: Default::default(),
                licenses,
            };
            let licenses_dir = self.dir.path().join("licenses");
            let template = self.dir.path().join("template.hbs");
            assemble(
                packages,
                &[],
                &config,
                &AssemblyOptions {
                    license_files_dir: &licenses_dir,
                    encoding,
                    template: &template,
                    format,
                },
            )
        }
    }

    fn entry(name: &str, file: Option<&str>) -> LicenseEntry {
        LicenseEntry {
            name: name.to_string(),
            file: file.map(PathBuf::from),
        }
    }

    #[test]
    fn test_sections_rendered_in_order_with_index() {
        let fx = Fixture::new(TEMPLATE);
        fx.license_file("mit.txt", "MIT TEXT\n");
        fx.license_file("isc.txt", "ISC TEXT\n");

        let mut isc = package("b", "2.0.0");
        isc.license = Some("ISC".to_string());
        let packages = vec![package("a", "1.0.0"), isc, package("c", "3.0.0")];

        let doc = fx
            .assemble(
                &packages,
                vec![entry("ISC", Some("isc.txt")), entry("MIT", Some("mit.txt"))],
                LicenseEncoding::None,
                OutputFormat::Text,
            )
            .unwrap();

        assert_eq!(
            doc.document,
            "1. MIT\n- a@1.0.0 (a authors)\n- c@3.0.0 (c authors)\nMIT TEXT\n2. ISC\n- b@2.0.0 (b authors)\nISC TEXT\n"
        );
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].libraries, 2);
    }

    #[test]
    fn test_product_entry_never_rendered() {
        let fx = Fixture::new(TEMPLATE);
        fx.license_file("mit.txt", "MIT TEXT");

        // Product deliberately not last
        let packages = vec![product("my-app", "1.0.0"), package("a", "1.0.0")];
        let doc = fx
            .assemble(
                &packages,
                vec![entry("MIT", Some("mit.txt"))],
                LicenseEncoding::None,
                OutputFormat::Text,
            )
            .unwrap();

        assert!(!doc.document.contains("my-app"));
        assert!(doc.document.contains("a@1.0.0"));
    }

    #[test]
    fn test_sections_without_text_dropped() {
        let fx = Fixture::new(TEMPLATE);
        fx.license_file("mit.txt", "MIT TEXT\n");

        let mut isc = package("b", "1.0.0");
        isc.license = Some("ISC".to_string());
        let mut bsd = package("c", "1.0.0");
        bsd.license = Some("BSD-3-Clause".to_string());
        let packages = vec![isc, bsd, package("a", "1.0.0")];

        let doc = fx
            .assemble(
                &packages,
                vec![
                    entry("MIT", Some("mit.txt")),
                    entry("ISC", None),
                    entry("BSD-3-Clause", Some("missing.txt")),
                ],
                LicenseEncoding::None,
                OutputFormat::Text,
            )
            .unwrap();

        assert_eq!(doc.document, "1. MIT\n- a@1.0.0 (a authors)\nMIT TEXT\n");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_json_string_round_trip() {
        let fx = Fixture::new(r#"{"licenses":[{{#each licenses}}{"name":"{{name}}","text": {{licenseText}} }{{/each}}]}"#);
        let original = "Copyright (c) \"The Authors\"\nAll rights \\ reserved.";
        fx.license_file("mit.txt", original);

        let doc = fx
            .assemble(
                &[package("a", "1.0.0")],
                vec![entry("MIT", Some("mit.txt"))],
                LicenseEncoding::JsonString,
                OutputFormat::Text,
            )
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&doc.document).unwrap();
        assert_eq!(parsed["licenses"][0]["text"], original);
    }

    #[test]
    fn test_html_format_escapes() {
        let fx = Fixture::new("{{#each licenses}}{{licenseText}}|{{{licenseText}}}{{/each}}");
        fx.license_file("mit.txt", "<b>&</b>");

        let doc = fx
            .assemble(
                &[package("a", "1.0.0")],
                vec![entry("MIT", Some("mit.txt"))],
                LicenseEncoding::None,
                OutputFormat::Html,
            )
            .unwrap();

        assert_eq!(doc.document, "&lt;b&gt;&amp;&lt;/b&gt;|<b>&</b>");
    }

    #[test]
    fn test_raw_data_available_to_template() {
        let fx = Fixture::new("{{#each licenses}}{{#each libraries}}{{data.name}} {{data.packageJsonPaths.[0]}}{{/each}}{{/each}}");
        fx.license_file("mit.txt", "MIT TEXT");

        let doc = fx
            .assemble(
                &[package("a", "1.0.0")],
                vec![entry("MIT", Some("mit.txt"))],
                LicenseEncoding::None,
                OutputFormat::Text,
            )
            .unwrap();

        assert_eq!(doc.document, "a node_modules/a/package.json");
    }

    #[test]
    fn test_invalid_packages_become_warnings() {
        let fx = Fixture::new("");
        let config = Config {
            overrides: Default::default(),
            licenses: vec![],
        };
        let licenses_dir = fx.dir.path().join("licenses");
        let template = fx.dir.path().join("template.hbs");
        let invalid = vec![InvalidPackage {
            package_file_path: PathBuf::from("node_modules/broken/package.json"),
        }];

        let doc = assemble(
            &[],
            &invalid,
            &config,
            &AssemblyOptions {
                license_files_dir: &licenses_dir,
                encoding: LicenseEncoding::None,
                template: &template,
                format: OutputFormat::Text,
            },
        )
        .unwrap();

        assert_eq!(doc.document, "");
        assert_eq!(doc.warnings, vec![invalid[0].warning()]);
    }

    #[test]
    fn test_broken_template_is_fatal() {
        let fx = Fixture::new("{{#each licenses}}unclosed");
        fx.license_file("mit.txt", "MIT TEXT");

        let err = fx
            .assemble(
                &[package("a", "1.0.0")],
                vec![entry("MIT", Some("mit.txt"))],
                LicenseEncoding::None,
                OutputFormat::Text,
            )
            .unwrap_err();
        assert!(matches!(err, PrintrError::TemplateRender(_)));
    }
}
