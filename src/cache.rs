//! Per-run build cache
//!
//! Maps (logical name, raw-content hash) to the finalized output so that
//! an asset referenced multiple times within a run is compiled at most
//! once. The cache is an explicit context object owned by the pipeline:
//! created per run, unbounded for the run's lifetime, discarded at run
//! end. Nothing persists across process invocations.

use std::collections::HashMap;

use crate::fingerprint::Fingerprint;

/// A fully compiled, resolved, minified, and fingerprinted asset
#[derive(Debug, Clone)]
pub struct Finalized {
    /// Final output text, exactly the bytes to be written
    pub text: String,
    /// Fingerprint of `text`, truncated per configuration
    pub fingerprint: Fingerprint,
    /// Output file name, `<stem>-<fingerprint>.<ext>`
    pub file_name: String,
}

/// In-run cache of finalized assets
///
/// The at-most-one-compute guarantee is enforced by the pipeline's
/// lookup-before-compute discipline; the cache itself is a plain map.
#[derive(Debug, Default)]
pub struct BuildCache {
    entries: HashMap<(String, Fingerprint), Finalized>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a finalized asset by name and raw-content hash.
    pub fn get(&self, name: &str, raw_hash: &Fingerprint) -> Option<&Finalized> {
        self.entries.get(&(name.to_string(), raw_hash.clone()))
    }

    /// Record a finalized asset.
    pub fn insert(&mut self, name: &str, raw_hash: Fingerprint, finalized: Finalized) {
        self.entries.insert((name.to_string(), raw_hash), finalized);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
