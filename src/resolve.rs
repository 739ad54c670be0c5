//! Reference resolution
//!
//! Compiled text may reference other logical assets with the helper
//! syntax `asset_path("name")` (single or double quotes). Each helper
//! call is replaced with the referenced asset's finalized output URL:
//! the configured serve-path prefix (verbatim) when present, otherwise
//! the default mount root, followed by the fingerprinted file name.
//!
//! The recursive walk that finalizes referenced assets lives in the
//! pipeline; this module only finds and rewrites the spans.

use std::collections::HashMap;

/// Default URL mount root used when no serve path is configured
pub const DEFAULT_MOUNT: &str = "/assets";

const HELPER: &str = "asset_path(";

/// One `asset_path(...)` occurrence in compiled text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Referenced logical asset name
    pub name: String,
    /// Byte offset of the start of the helper call
    pub start: usize,
    /// Byte offset one past the closing parenthesis
    pub end: usize,
}

/// Find every `asset_path` helper call in `text`.
///
/// Fails with a descriptive message when a helper call is malformed
/// (missing quotes or an unclosed parenthesis).
pub fn find_references(text: &str) -> Result<Vec<AssetRef>, String> {
    let mut refs = Vec::new();
    let mut search_from = 0usize;

    while let Some(found) = text[search_from..].find(HELPER) {
        let start = search_from + found;

        // Only match the helper at an identifier boundary, so names like
        // `my_asset_path(` are left alone.
        let preceded_by_ident = text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if preceded_by_ident {
            search_from = start + HELPER.len();
            continue;
        }

        let rest = &text[start + HELPER.len()..];
        let rest = rest.trim_start();
        let trimmed = (text.len() - start - HELPER.len()) - rest.len();
        let mut offset = start + HELPER.len() + trimmed;

        let quote = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                return Err(format!(
                    "malformed asset_path reference at line {}: expected quoted name",
                    line_of(text, start)
                ));
            }
        };
        offset += quote.len_utf8();

        let name_len = match text[offset..].find(quote) {
            Some(len) => len,
            None => {
                return Err(format!(
                    "malformed asset_path reference at line {}: unterminated name",
                    line_of(text, start)
                ));
            }
        };
        let name = &text[offset..offset + name_len];
        offset += name_len + quote.len_utf8();

        let after = text[offset..].trim_start();
        if !after.starts_with(')') {
            return Err(format!(
                "malformed asset_path reference at line {}: missing ')'",
                line_of(text, start)
            ));
        }
        let end = offset + (text[offset..].len() - after.len()) + 1;

        refs.push(AssetRef {
            name: name.to_string(),
            start,
            end,
        });
        search_from = end;
    }

    Ok(refs)
}

/// Replace each reference span with its resolved URL.
///
/// `urls` must contain an entry for every reference name; the pipeline
/// finalizes each referenced asset before calling this.
pub fn rewrite(text: &str, refs: &[AssetRef], urls: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for r in refs {
        out.push_str(&text[cursor..r.start]);
        out.push_str(&urls[&r.name]);
        cursor = r.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Build the URL for a finalized output file.
///
/// An empty serve path falls back to the default mount root; a configured
/// serve path is used verbatim apart from a trailing-slash trim, so CDN
/// prefixes like `//cdn.example.com` pass straight through.
pub fn output_url(serve_path: &str, file_name: &str) -> String {
    let prefix = if serve_path.is_empty() {
        DEFAULT_MOUNT
    } else {
        serve_path.trim_end_matches('/')
    };
    format!("{prefix}/{file_name}")
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
