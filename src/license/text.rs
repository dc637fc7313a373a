use std::path::Path;

use crate::config::LicenseEntry;
use crate::error::{PrintrError, Result};

/// How license text is transformed before it reaches the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LicenseEncoding {
    /// Inserted as read.
    #[default]
    None,
    /// Encoded as a JSON string literal (quotes included), for templates that
    /// generate JSON or JavaScript.
    JsonString,
}

impl LicenseEncoding {
    pub fn apply(self, text: String) -> Result<String> {
        match self {
            LicenseEncoding::None => Ok(text),
            LicenseEncoding::JsonString => Ok(serde_json::to_string(&text)?),
        }
    }
}

/// The loaded full text of one allow-listed license.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseText {
    pub license_name: String,
    pub text: String,
}

/// Read the text file of every allow-list entry that names one which exists.
///
/// Entries without `file`, or whose file is absent, are skipped. A file that
/// exists but cannot be read aborts the run.
pub fn load_license_texts(
    entries: &[LicenseEntry],
    license_files_dir: &Path,
    encoding: LicenseEncoding,
) -> Result<Vec<LicenseText>> {
    let mut texts = Vec::new();

    for entry in entries {
        let Some(file) = &entry.file else {
            continue;
        };

        let path = license_files_dir.join(file);
        if !path.exists() {
            tracing::debug!(
                "license text for {} not found at {}",
                entry.name,
                path.display()
            );
            continue;
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| PrintrError::LicenseTextRead {
            path: path.clone(),
            source,
        })?;

        texts.push(LicenseText {
            license_name: entry.name.clone(),
            text: encoding.apply(raw)?,
        });
    }

    Ok(texts)
}
