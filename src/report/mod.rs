//! Run results and their renderers.
//!
//! A run ends in exactly one [`RunResult`]: either an [`ErrorBundle`] listing
//! every compliance problem, or a [`RenderedDocument`].
//!
//! - [`terminal`] — colored stderr output; section table with `--verbose`.

pub mod terminal;

use serde::Serialize;

/// The outcome of one run. Serializes with a `type` tag of `"Error"` or `"Document"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RunResult {
    Error(ErrorBundle),
    Document(RenderedDocument),
}

/// Ordered violation report: one header line per category followed by its items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorBundle {
    /// Each line ends with `\n`; headers also start with one.
    pub message: Vec<String>,
}

impl ErrorBundle {
    pub fn header(&mut self, text: &str) {
        self.message.push(format!("\n{}\n", text));
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        self.message.push(format!("{}\n", text.as_ref()));
    }
}

impl std::fmt::Display for ErrorBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in &self.message {
            f.write_str(m)?;
        }
        Ok(())
    }
}

/// A successfully rendered attribution document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub document: String,
    /// Non-fatal notes, e.g. dependency manifests that could not be parsed.
    pub warnings: Vec<String>,
    pub sections: Vec<SectionSummary>,
}

/// What ended up in one rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub index: usize,
    pub license: String,
    pub libraries: usize,
}
