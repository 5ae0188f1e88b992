use std::path::{Path, PathBuf};

use sourcemap::SourceMap;

use crate::path_resolve::normalize_path;

/// Reverse lookup from generated-stylesheet positions to the original file
/// that produced them. Wraps the parsed input map together with the base
/// directory its relative `sources` entries resolve against; immutable
/// after construction and discarded with the unit.
pub struct ReverseIndex<'a> {
    map: &'a SourceMap,
    base: PathBuf,
}

/// Reconstruct the absolute path of one `sources` entry.
///
/// Rules, in order: strip a `sourceRoot` prefix (parsed maps hand sources
/// back with the root and its joiner separator already folded in), trim a
/// leading `./`, prepend `sourceRoot` to relative entries, join against
/// the unit base, normalize `..` segments.
pub fn absolute_source(base: &Path, source_root: Option<&str>, source: &str) -> PathBuf {
    let root = source_root.unwrap_or("");

    let mut s = source.to_string();
    if !root.is_empty() && s.starts_with(root) {
        s = s[root.len()..]
            .trim_start_matches(|c| c == '/' || c == '\\')
            .to_string();
    }
    let trimmed = s.trim_start_matches("./");

    let combined = if !root.is_empty() && !Path::new(trimmed).is_absolute() {
        if root.ends_with('/') {
            format!("{}{}", root, trimmed)
        } else {
            format!("{}/{}", root, trimmed)
        }
    } else {
        trimmed.to_string()
    };

    normalize_path(&base.join(combined))
}

impl<'a> ReverseIndex<'a> {
    pub fn new(map: &'a SourceMap, base: &Path) -> Self {
        Self { map, base: base.to_path_buf() }
    }

    /// Absolute path of the original file that produced the given
    /// generated position (0-based line and column), or `None` when the
    /// map has no covering mapping or the mapped source is empty.
    pub fn original_file_for(&self, line: u32, col: u32) -> Option<PathBuf> {
        let token = self.map.lookup_token(line, col)?;
        let source = token.get_source()?;
        if source.is_empty() {
            return None;
        }
        Some(absolute_source(&self.base, self.map.get_source_root(), source))
    }

    /// Directory of the original file for the given generated position.
    /// URL references in a declaration are relative to this directory.
    pub fn original_dir_for(&self, line: u32, col: u32) -> Option<PathBuf> {
        self.original_file_for(line, col)
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
    }
}
