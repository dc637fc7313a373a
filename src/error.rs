use std::path::PathBuf;

use thiserror::Error;

/// Operational failures that abort a run. Compliance violations are not errors;
/// they are collected into an [`ErrorBundle`](crate::report::ErrorBundle).
#[derive(Error, Debug)]
pub enum PrintrError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no config file found (searched: {searched})")]
    ConfigNotFound { searched: String },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("failed to read license text {path}: {source}")]
    LicenseTextRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode license text: {0}")]
    LicenseTextEncode(#[from] serde_json::Error),

    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render template: {0}")]
    TemplateRender(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, PrintrError>;
