//! Core asset model types
//!
//! A logical asset is identified by its family (style or script) plus its
//! logical name, e.g. `unminified.css`. The logical name is stable across
//! builds; the written file name embeds the content fingerprint.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::MasonResult;
use crate::fingerprint::Fingerprint;

/// Asset family (closed set)
///
/// The set of supported families is fixed and small, so families are a
/// tagged enum rather than open-ended dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFamily {
    /// Stylesheets (`.css`)
    Style,
    /// Scripts (`.js`)
    Script,
}

impl AssetFamily {
    /// Map a file extension to a family. Unknown extensions are not assets.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "css" => Some(AssetFamily::Style),
            "js" => Some(AssetFamily::Script),
            _ => None,
        }
    }

    /// Canonical output extension for the family
    pub fn extension(&self) -> &'static str {
        match self {
            AssetFamily::Style => "css",
            AssetFamily::Script => "js",
        }
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetFamily::Style => write!(f, "style"),
            AssetFamily::Script => write!(f, "script"),
        }
    }
}

/// A discovered source file for one logical asset
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Logical asset name (the file name, e.g. `unminified.css`)
    pub name: String,
    /// Asset family derived from the extension
    pub family: AssetFamily,
    /// Path of the source on disk
    pub path: PathBuf,
}

impl SourceFile {
    /// Read the raw source text from disk
    pub fn read_raw(&self) -> MasonResult<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Output file name for a logical asset: `<stem>-<fingerprint>.<ext>`
pub fn output_file_name(name: &str, fingerprint: &Fingerprint) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{fingerprint}.{ext}"),
        None => format!("{name}-{fingerprint}"),
    }
}
