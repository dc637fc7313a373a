//! License metadata helpers shared by validation and document assembly.
//!
//! - [`copyright`] — derives one attribution string per package.
//! - [`sections`] — groups packages by license name and joins license texts.
//! - [`text`] — loads license-text files and applies the template encoding.

pub mod copyright;
pub mod sections;
pub mod text;
