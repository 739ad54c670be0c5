//! mason - static asset compiler with content fingerprinting
//!
//! mason compiles stylesheets and scripts from a set of source
//! directories, fingerprints the compiled output by content hash, writes
//! fingerprinted files to an output directory, and emits a manifest
//! mapping logical asset names to fingerprinted file names. References
//! between assets (`asset_path("name")`) are rewritten to the referenced
//! asset's fingerprinted path during the same build.

pub mod cache;
pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod manifest;
pub mod minify;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod sources;
pub mod writer;

// Re-exports for convenience
pub use cache::{BuildCache, Finalized};
pub use compile::{compiler_for, AssetCompiler, CompileContext};
pub use config::{BuildConfig, ConfigWarning};
pub use error::{MasonError, MasonResult};
pub use fingerprint::Fingerprint;
pub use manifest::{Manifest, MANIFEST_FILE};
pub use models::{AssetFamily, SourceFile};
pub use pipeline::{build, AssetState, BuildOutcome, Pipeline};
pub use sources::SourceSet;
