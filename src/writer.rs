//! Atomic output writing
//!
//! Output files are written to a temporary file in the destination
//! directory and renamed into place, so no partial or interleaved write
//! of an asset's output is ever observable.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::error::{MasonError, MasonResult};

/// Write `bytes` to `path` atomically, creating parent directories.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> MasonResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|source| MasonError::Write {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|source| MasonError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.write_all(bytes).map_err(|source| MasonError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.persist(path).map_err(|e| MasonError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Write a gzipped sibling of `path` (`<path>.gz`), returning its path.
pub fn write_gzip(path: &Path, bytes: &[u8]) -> MasonResult<PathBuf> {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".gz");
    let gz_path = path.with_file_name(name);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;

    atomic_write(&gz_path, &compressed)?;
    Ok(gz_path)
}
