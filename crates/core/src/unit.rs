use std::fmt;
use std::path::PathBuf;

use sourcemap::SourceMap;

/// Source map attached to a unit: either raw JSON text (the common case when
/// the map was read from disk) or an already-parsed map handed over by an
/// upstream stage.
pub enum MapPayload {
    Json(String),
    Parsed(SourceMap),
}

impl fmt::Debug for MapPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapPayload::Json(json) => write!(f, "Json({} bytes)", json.len()),
            MapPayload::Parsed(_) => write!(f, "Parsed(..)"),
        }
    }
}

/// One generated stylesheet flowing through the pipeline.
///
/// `path` is the absolute location of the generated file; `base` is the
/// directory against which relative `sources` entries in the map are
/// resolved (usually the generated file's own directory).
#[derive(Debug)]
pub struct StyleUnit {
    pub path: PathBuf,
    pub base: PathBuf,
    pub contents: String,
    pub source_map: Option<MapPayload>,
}

impl StyleUnit {
    pub fn new(path: PathBuf, base: PathBuf, contents: String, source_map: Option<MapPayload>) -> Self {
        Self { path, base, contents, source_map }
    }

    /// Directory containing the generated file; relative rewrites are
    /// computed against it.
    pub fn dir(&self) -> PathBuf {
        self.path.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("/"))
    }
}
