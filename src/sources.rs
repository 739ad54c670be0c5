//! Source discovery
//!
//! Walks the configured input directories and maps each recognized file
//! to a logical asset. The logical name is the bare file name, so the
//! same name appearing twice (across or within directories) is an error
//! rather than a silent shadow. Files with unrecognized extensions are
//! skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use ignore::WalkBuilder;

use crate::error::{MasonError, MasonResult};
use crate::models::{AssetFamily, SourceFile};

/// All sources discovered for one build run
#[derive(Debug, Default)]
pub struct SourceSet {
    files: BTreeMap<String, SourceFile>,
}

impl SourceSet {
    /// Scan `dirs` for asset sources.
    pub fn discover(dirs: &[PathBuf]) -> MasonResult<Self> {
        let mut files: BTreeMap<String, SourceFile> = BTreeMap::new();

        for dir in dirs {
            if !dir.is_dir() {
                return Err(MasonError::DirectoryNotFound { path: dir.clone() });
            }

            // Asset directories are walked as-is: no gitignore or hidden
            // filtering, since build inputs are explicit.
            let walk = WalkBuilder::new(dir).standard_filters(false).build();
            for entry in walk {
                let entry = entry.map_err(|e| {
                    MasonError::Io(std::io::Error::other(e.to_string()))
                })?;
                let path = entry.path();
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }

                let Some(family) = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(AssetFamily::from_extension)
                else {
                    continue;
                };

                let name = match path.file_name().and_then(|n| n.to_str()) {
                    Some(n) => n.to_string(),
                    None => continue,
                };

                if let Some(existing) = files.get(&name) {
                    return Err(MasonError::DuplicateAsset {
                        name,
                        first: existing.path.clone(),
                        second: path.to_path_buf(),
                    });
                }

                files.insert(
                    name.clone(),
                    SourceFile {
                        name,
                        family,
                        path: path.to_path_buf(),
                    },
                );
            }
        }

        Ok(Self { files })
    }

    /// Look up a source by logical name.
    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.files.get(name)
    }

    /// Logical names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Logical name set, for the compile context
    pub fn known_names(&self) -> BTreeSet<String> {
        self.files.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_css_and_js() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.css"), "body{}").unwrap();
        fs::write(dir.path().join("app.js"), "var a;").unwrap();
        fs::write(dir.path().join("readme.txt"), "skip me").unwrap();

        let sources = SourceSet::discover(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get("app.css").unwrap().family, AssetFamily::Style);
        assert_eq!(sources.get("app.js").unwrap().family, AssetFamily::Script);
        assert!(sources.get("readme.txt").is_none());
    }

    #[test]
    fn walks_nested_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.css"), "a{}").unwrap();

        let sources = SourceSet::discover(&[dir.path().to_path_buf()]).unwrap();

        assert!(sources.get("deep.css").is_some());
    }

    #[test]
    fn merges_multiple_input_directories() {
        let css = tempdir().unwrap();
        let js = tempdir().unwrap();
        fs::write(css.path().join("style.css"), "a{}").unwrap();
        fs::write(js.path().join("main.js"), "var a;").unwrap();

        let sources =
            SourceSet::discover(&[css.path().to_path_buf(), js.path().to_path_buf()]).unwrap();

        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn duplicate_name_is_an_error() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        fs::write(a.path().join("app.css"), "a{}").unwrap();
        fs::write(b.path().join("app.css"), "b{}").unwrap();

        let err =
            SourceSet::discover(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap_err();

        assert!(matches!(err, MasonError::DuplicateAsset { .. }), "{err}");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = SourceSet::discover(&[PathBuf::from("/no/such/dir")]).unwrap_err();
        assert!(matches!(err, MasonError::DirectoryNotFound { .. }), "{err}");
    }

    #[test]
    fn read_raw_returns_source_text() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.css"), "body { color: red; }").unwrap();

        let sources = SourceSet::discover(&[dir.path().to_path_buf()]).unwrap();
        let raw = sources.get("app.css").unwrap().read_raw().unwrap();

        assert_eq!(raw, "body { color: red; }");
    }
}
