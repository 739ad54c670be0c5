//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use mason::BuildConfig;

/// CSS source whose minified form is a known literal
pub const UNMINIFIED_CSS: &str =
    "body {\n  background-color: #000;\n  color: #fff;\n}\n\na {\n  display: none;\n}\n";

/// Expected minified output for `UNMINIFIED_CSS`
pub const MINIFIED_CSS: &str = "body{background-color:#000;color:#fff}a{display:none}";

/// JS source wrapped in an immediately-invoked function
pub const UNMINIFIED_JS: &str = "(function () {\n  var aString = \"A string\";\n\n  var anObject = {\n    aLongKeyName: function () {\n      return aString;\n    }\n  };\n\n  anObject.aLongKeyName();\n})();\n";

/// A test asset tree: css and js input directories plus an output
/// directory, all inside one tempdir.
pub struct Fixture {
    pub root: TempDir,
    pub css_dir: PathBuf,
    pub js_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Fixture {
    /// Build config targeting both input directories.
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            input_dirs: vec![self.css_dir.clone(), self.js_dir.clone()],
            output_dir: self.out_dir.clone(),
            ..BuildConfig::default()
        }
    }

    /// Read a written output file by its manifest-relative name.
    pub fn read_output(&self, rel: &str) -> String {
        fs::read_to_string(self.out_dir.join(rel)).unwrap()
    }
}

/// Create the standard asset tree used across the integration tests.
pub fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let css_dir = root.path().join("assets").join("css");
    let js_dir = root.path().join("assets").join("js");
    let out_dir = root.path().join("builtAssets");
    fs::create_dir_all(&css_dir).unwrap();
    fs::create_dir_all(&js_dir).unwrap();

    fs::write(css_dir.join("unminified.css"), UNMINIFIED_CSS).unwrap();
    fs::write(css_dir.join("asset.css"), ".asset {\n  border: none;\n}\n").unwrap();
    fs::write(
        css_dir.join("asset-path-helper.css"),
        "@import \"asset_path('asset.css')\";\n",
    )
    .unwrap();
    fs::write(js_dir.join("unminified.js"), UNMINIFIED_JS).unwrap();
    fs::write(js_dir.join("blank.js"), "").unwrap();

    Fixture {
        root,
        css_dir,
        js_dir,
        out_dir,
    }
}

/// Extract the fingerprint hex from `<stem>-<hex>.<ext>`.
pub fn fingerprint_of(file_name: &str) -> &str {
    let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
    let (_, hex) = stem.rsplit_once('-').expect("fingerprinted name");
    hex
}
