//! Build manifest
//!
//! The manifest is the sole contract consumed by downstream asset-serving
//! middleware: an insertion-ordered mapping from logical asset name to the
//! fingerprinted output file, serialized as JSON under an `assets` key.
//! It must be loadable independently of the pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MasonResult;
use crate::writer;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Logical name → output relative path mapping
///
/// Entry order is insertion order (serde_json's `preserve_order`), so
/// serialization is reproducible across identical runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    assets: Map<String, Value>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finalized asset. Later records for the same name
    /// overwrite, keeping the original position.
    pub fn record(&mut self, name: &str, output_rel_path: &str) {
        self.assets
            .insert(name.to_string(), Value::String(output_rel_path.to_string()));
    }

    /// Output relative path for a logical name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assets.get(name).and_then(Value::as_str)
    }

    /// Logical names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Serialize to pretty JSON bytes with a trailing newline
    pub fn to_bytes(&self) -> MasonResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Write `manifest.json` atomically into `output_dir`, returning its
    /// path.
    pub fn write_to(&self, output_dir: &Path) -> MasonResult<PathBuf> {
        let path = output_dir.join(MANIFEST_FILE);
        writer::atomic_write(&path, &self.to_bytes()?)?;
        Ok(path)
    }

    /// Load a previously written manifest.
    pub fn load(path: &Path) -> MasonResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
