//! Build configuration
//!
//! Configuration comes from an optional `mason.toml` in the working
//! directory, overridden field-by-field by CLI flags. Unknown keys are
//! surfaced as non-fatal warnings instead of being silently dropped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MasonError, MasonResult};
use crate::fingerprint;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "mason.toml";

/// Default output directory name
pub const DEFAULT_OUTPUT_DIR: &str = "builtAssets";

/// Recognized build options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directories scanned for asset sources
    pub input_dirs: Vec<PathBuf>,

    /// Restrict written output to these logical names; empty = all
    /// discovered assets
    pub compile_only: Vec<String>,

    /// Prefix applied to rewritten references; empty = root-relative
    /// mount (`/assets`)
    pub serve_path: String,

    /// Minify compiled output before fingerprinting
    pub minify: bool,

    /// Directory receiving fingerprinted files and the manifest
    pub output_dir: PathBuf,

    /// Also write a gzipped sibling next to each output file
    pub gzip: bool,

    /// Embed the content fingerprint in output file names
    pub fingerprint: bool,

    /// Hex digits retained from the content digest in file names
    pub fingerprint_len: usize,

    /// Write and record transitively referenced assets even when they
    /// are not requested
    pub include_transitive: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_dirs: Vec::new(),
            compile_only: Vec::new(),
            serve_path: String::new(),
            minify: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            gzip: false,
            fingerprint: true,
            fingerprint_len: fingerprint::DEFAULT_LEN,
            include_transitive: false,
        }
    }
}

/// Non-fatal configuration warning surfaced to CLI users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

/// Load configuration and collect non-fatal warnings (unknown keys).
pub fn load_with_warnings(path: &Path) -> MasonResult<(BuildConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: BuildConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| MasonError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| ConfigWarning {
            key,
            file: path.to_path_buf(),
        })
        .collect();

    Ok((config, warnings))
}

/// Load `mason.toml` from `dir` when present, falling back to defaults.
pub fn load_or_default(dir: &Path) -> MasonResult<(BuildConfig, Vec<ConfigWarning>)> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        load_with_warnings(&path)
    } else {
        Ok((BuildConfig::default(), Vec::new()))
    }
}
