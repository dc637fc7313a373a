use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::report::{ErrorBundle, RenderedDocument, RunResult};

/// Print the run outcome to stderr. The document itself is written by the caller.
pub fn render(result: &RunResult, verbose: bool, quiet: bool) {
    match result {
        RunResult::Error(bundle) => render_errors(bundle),
        RunResult::Document(doc) => render_document(doc, verbose, quiet),
    }
}

fn render_errors(bundle: &ErrorBundle) {
    for m in &bundle.message {
        if m.starts_with('\n') {
            eprint!("{}", m.red().bold());
        } else {
            eprint!("{}", m);
        }
    }
    eprintln!("\n {} license check failed", "✗".red());
}

fn render_document(doc: &RenderedDocument, verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    for w in &doc.warnings {
        eprintln!(" {} {}", "⚠".yellow(), w.yellow());
    }

    let libraries: usize = doc.sections.iter().map(|s| s.libraries).sum();
    eprintln!(
        " {} {} licenses, {} libraries",
        "✓".green(),
        doc.sections.len(),
        libraries
    );

    if verbose && !doc.sections.is_empty() {
        eprintln!("{}", section_table(doc));
    }
}

fn section_table(doc: &RenderedDocument) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Libraries").add_attribute(Attribute::Bold),
        ]);

    for s in &doc.sections {
        table.add_row(vec![
            Cell::new(s.index).set_alignment(CellAlignment::Right),
            Cell::new(&s.license),
            Cell::new(s.libraries).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SectionSummary;

    #[test]
    fn test_section_table_lists_every_section() {
        let doc = RenderedDocument {
            document: String::new(),
            warnings: vec![],
            sections: vec![
                SectionSummary {
                    index: 1,
                    license: "MIT".to_string(),
                    libraries: 12,
                },
                SectionSummary {
                    index: 2,
                    license: "Apache-2.0".to_string(),
                    libraries: 3,
                },
            ],
        };

        let rendered = section_table(&doc).to_string();
        assert!(rendered.contains("MIT"));
        assert!(rendered.contains("Apache-2.0"));
        assert!(rendered.contains("12"));
    }
}
