//! Error types for mason
//!
//! Uses `thiserror` for library errors. The CLI layer wraps these in
//! `anyhow` for reporting.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::AssetFamily;

/// Result type alias for mason operations
pub type MasonResult<T> = Result<T, MasonError>;

/// Main error type for mason operations
///
/// Every variant aborts the build run; there is no partial manifest on
/// failure.
#[derive(Error, Debug)]
pub enum MasonError {
    /// Malformed source in a given asset family
    #[error("{family} compile failed for '{name}': {message}")]
    Compile {
        family: AssetFamily,
        name: String,
        message: String,
    },

    /// Reference cycle detected during resolution
    #[error("circular asset reference: {chain}")]
    CircularReference { chain: String },

    /// Minification step failed; the run fails rather than silently
    /// emitting unminified output
    #[error("{family} minify failed for '{name}': {message}")]
    Minify {
        family: AssetFamily,
        name: String,
        message: String,
    },

    /// A reference points to a logical name not found among discovered
    /// sources
    #[error("asset '{name}' (referenced from {referenced_from}) not found in any input directory")]
    MissingAsset {
        name: String,
        referenced_from: String,
    },

    /// Two source files map to the same logical name
    #[error("duplicate asset name '{name}': {first} and {second}")]
    DuplicateAsset {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Input directory does not exist
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// I/O failure writing an output file or the manifest
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest serialization error
    #[error("manifest serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },
}
