use std::path::PathBuf;

use clap::Parser;

use crate::assembler::OutputFormat;
use crate::config::Severity;
use crate::license::text::LicenseEncoding;

#[derive(Parser, Debug)]
#[command(
    name = "license-printr",
    about = "Check npm dependencies against a license allow-list and print an attribution document",
    version
)]
pub struct Cli {
    /// The product's package.json
    #[arg(long = "package-json", value_name = "FILE", default_value = "package.json")]
    pub package_json: PathBuf,

    /// Additional node_modules directory to search (repeatable)
    #[arg(long = "node-modules", value_name = "DIR")]
    pub node_modules: Vec<PathBuf>,

    /// Directory holding the license text files named in the config
    #[arg(long = "license-files", value_name = "DIR", default_value = ".")]
    pub license_files: PathBuf,

    /// Config file [default: <package dir>/.license-printr/config.json, fallback ~/.config/license-printr/config.json]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Handlebars template used to print the document
    #[arg(long, value_name = "FILE")]
    pub template: PathBuf,

    /// Where to write the document; stdout when omitted
    #[arg(long = "document-file", value_name = "FILE")]
    pub document_file: Option<PathBuf>,

    /// Where to write the error report on failure
    #[arg(long = "error-log-file", value_name = "FILE")]
    pub error_log_file: Option<PathBuf>,

    /// Compare version strings literally instead of as npm ranges
    #[arg(long)]
    pub disable_npm_version_check: bool,

    /// Transform applied to license text before templating
    #[arg(long, value_name = "MODE", default_value = "none", ignore_case = true)]
    pub license_text_modifier: EncodingArg,

    /// Treatment of homepage overrides that match no package
    #[arg(long, value_name = "LEVEL", default_value = "error")]
    pub error_level_redundant_homepage_overrides: SeverityArg,

    /// Treatment of license overrides that match no package
    #[arg(long, value_name = "LEVEL", default_value = "error")]
    pub error_level_redundant_license_overrides: SeverityArg,

    /// Template escaping: `text` inserts {{value}} verbatim, `html` HTML-escapes it (stock Handlebars)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: FormatArg,

    /// How the run result is reported
    #[arg(long, value_name = "REPORT", default_value = "terminal")]
    pub report: ReportFormat,

    /// Debug logging and a per-section summary table
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum EncodingArg {
    None,
    #[value(alias = "jsonstring")]
    JsonString,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SeverityArg {
    Error,
    Suppress,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum FormatArg {
    Text,
    Html,
}

impl From<&EncodingArg> for LicenseEncoding {
    fn from(arg: &EncodingArg) -> Self {
        match arg {
            EncodingArg::None => LicenseEncoding::None,
            EncodingArg::JsonString => LicenseEncoding::JsonString,
        }
    }
}

impl From<&SeverityArg> for Severity {
    fn from(arg: &SeverityArg) -> Self {
        match arg {
            SeverityArg::Error => Severity::Error,
            SeverityArg::Suppress => Severity::Suppress,
        }
    }
}

impl From<&FormatArg> for OutputFormat {
    fn from(arg: &FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}
