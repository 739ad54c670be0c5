//! Build pipeline orchestrator
//!
//! Drives each requested logical asset through
//! `Pending → Compiling → Resolving → Minifying → Fingerprinted → Written`.
//! Transitions are strictly forward. Resolving may recursively push a
//! referenced asset through its own chain up to `Fingerprinted` before the
//! dependent asset can proceed; the recursion is an explicit graph walk
//! with a visiting stack, so cycles are detected and reported with the
//! full chain instead of overflowing.
//!
//! Any failure aborts the entire run: the manifest is only written after
//! every requested asset has been written. Output files already written
//! by an aborted run are not rolled back; callers needing a clean slate
//! clear the output directory themselves.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::cache::{BuildCache, Finalized};
use crate::compile::{compiler_for, CompileContext};
use crate::config::BuildConfig;
use crate::error::{MasonError, MasonResult};
use crate::fingerprint::Fingerprint;
use crate::manifest::Manifest;
use crate::minify;
use crate::models::{output_file_name, AssetFamily};
use crate::resolve;
use crate::sources::SourceSet;
use crate::writer;

/// Lifecycle of one logical asset within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetState {
    Pending,
    Compiling,
    Resolving,
    Minifying,
    Fingerprinted,
    Written,
}

/// Result of a successful build run
#[derive(Debug)]
pub struct BuildOutcome {
    /// Logical name → output file mapping, in write order
    pub manifest: Manifest,
    /// Paths of all written output files (gzip siblings included)
    pub written: Vec<PathBuf>,
    /// Path of the written manifest file
    pub manifest_path: PathBuf,
}

/// Discover sources and run the full pipeline for `config`.
pub fn build(config: &BuildConfig) -> MasonResult<BuildOutcome> {
    let sources = SourceSet::discover(&config.input_dirs)?;
    Pipeline::new(config, sources).run()
}

/// One build run over a fixed source set
///
/// Owns the manifest and build cache for the duration of the run; both
/// are discarded when the run ends.
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    sources: SourceSet,
    known_names: BTreeSet<String>,
    cache: BuildCache,
    states: HashMap<String, AssetState>,
    visiting: Vec<String>,
    finalized_order: Vec<String>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BuildConfig, sources: SourceSet) -> Self {
        let known_names = sources.known_names();
        Self {
            config,
            sources,
            known_names,
            cache: BuildCache::new(),
            states: HashMap::new(),
            visiting: Vec::new(),
            finalized_order: Vec::new(),
        }
    }

    /// Current state of a logical asset, if it has entered the pipeline.
    pub fn state(&self, name: &str) -> Option<AssetState> {
        self.states.get(name).copied()
    }

    /// Run the pipeline to completion.
    pub fn run(mut self) -> MasonResult<BuildOutcome> {
        let requested: Vec<String> = if self.config.compile_only.is_empty() {
            self.sources.names().map(str::to_string).collect()
        } else {
            for name in &self.config.compile_only {
                if self.sources.get(name).is_none() {
                    return Err(MasonError::MissingAsset {
                        name: name.clone(),
                        referenced_from: "the compile request".to_string(),
                    });
                }
            }
            self.config.compile_only.clone()
        };

        for name in &requested {
            self.states.insert(name.clone(), AssetState::Pending);
        }

        for name in &requested {
            self.finalize(name)?;
        }

        let mut to_write = requested;
        if self.config.include_transitive {
            let extra: Vec<String> = self
                .finalized_order
                .iter()
                .filter(|name| !to_write.contains(name))
                .cloned()
                .collect();
            to_write.extend(extra);
        }

        let mut manifest = Manifest::new();
        let mut written = Vec::new();
        for name in &to_write {
            // Cache hit: finalize returns the memoized entry without
            // recompiling.
            let entry = self.finalize(name)?;
            let path = self.config.output_dir.join(&entry.file_name);
            writer::atomic_write(&path, entry.text.as_bytes())?;
            if self.config.gzip {
                written.push(writer::write_gzip(&path, entry.text.as_bytes())?);
            }
            manifest.record(name, &entry.file_name);
            self.set_state(name, AssetState::Written);
            written.push(path);
        }

        let manifest_path = manifest.write_to(&self.config.output_dir)?;

        Ok(BuildOutcome {
            manifest,
            written,
            manifest_path,
        })
    }

    /// Drive one asset to `Fingerprinted`, recursively finalizing any
    /// assets it references. Memoized through the build cache.
    fn finalize(&mut self, name: &str) -> MasonResult<Finalized> {
        if let Some(pos) = self.visiting.iter().position(|v| v == name) {
            let mut chain: Vec<&str> = self.visiting[pos..].iter().map(String::as_str).collect();
            chain.push(name);
            return Err(MasonError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        let (family, raw) = {
            let source = self.sources.get(name).ok_or_else(|| MasonError::MissingAsset {
                name: name.to_string(),
                referenced_from: self
                    .visiting
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "the build request".to_string()),
            })?;
            (source.family, source.read_raw()?)
        };

        let raw_hash = Fingerprint::full(raw.as_bytes());
        if let Some(hit) = self.cache.get(name, &raw_hash) {
            return Ok(hit.clone());
        }

        self.visiting.push(name.to_string());
        self.set_state(name, AssetState::Compiling);
        let compiled = {
            let ctx = CompileContext {
                known_names: &self.known_names,
            };
            compiler_for(family).compile(name, &raw, &ctx)?
        };

        self.set_state(name, AssetState::Resolving);
        let resolved = self.resolve_references(name, family, compiled)?;

        let final_text = if self.config.minify {
            self.set_state(name, AssetState::Minifying);
            minify::minify(family, name, &resolved)?
        } else {
            resolved
        };

        let fingerprint = Fingerprint::from_bytes(final_text.as_bytes(), self.config.fingerprint_len);
        let file_name = if self.config.fingerprint {
            output_file_name(name, &fingerprint)
        } else {
            name.to_string()
        };
        let entry = Finalized {
            text: final_text,
            fingerprint,
            file_name,
        };
        self.cache.insert(name, raw_hash, entry.clone());

        self.visiting.pop();
        self.finalized_order.push(name.to_string());
        self.set_state(name, AssetState::Fingerprinted);
        Ok(entry)
    }

    /// Rewrite `asset_path` references in `text` to the referenced
    /// assets' finalized output URLs, finalizing each referenced asset
    /// first.
    fn resolve_references(
        &mut self,
        name: &str,
        family: AssetFamily,
        text: String,
    ) -> MasonResult<String> {
        let refs = resolve::find_references(&text).map_err(|message| MasonError::Compile {
            family,
            name: name.to_string(),
            message,
        })?;
        if refs.is_empty() {
            return Ok(text);
        }

        let mut urls: HashMap<String, String> = HashMap::new();
        for r in &refs {
            if urls.contains_key(&r.name) {
                continue;
            }
            let dep = self.finalize(&r.name)?;
            urls.insert(
                r.name.clone(),
                resolve::output_url(&self.config.serve_path, &dep.file_name),
            );
        }

        Ok(resolve::rewrite(&text, &refs, &urls))
    }

    fn set_state(&mut self, name: &str, next: AssetState) {
        let state = self
            .states
            .entry(name.to_string())
            .or_insert(AssetState::Pending);
        debug_assert!(
            *state <= next,
            "asset '{name}' state may only move forward ({state:?} -> {next:?})"
        );
        *state = next;
    }
}
