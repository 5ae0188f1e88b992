use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::{find_annotation, with_annotation};
use crate::pipeline::Outcome;
use crate::unit::{MapPayload, StyleUnit};

#[derive(Error, Debug)]
pub enum CLIError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid extension (expected .css): {}", .0.display())]
    InvalidExtension(PathBuf),
    #[error("could not read source map {}", .0.display())]
    UnreadableMap(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Validate that the given path is an existing `.css` file and return its
/// canonicalized absolute form.
pub fn validate_css_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, CLIError> {
    let path_ref = path.as_ref();

    if path_ref
        .extension()
        .and_then(|e| e.to_str())
        .map_or(true, |ext| ext != "css")
    {
        return Err(CLIError::InvalidExtension(path_ref.to_path_buf()));
    }

    match fs::metadata(path_ref) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(CLIError::InvalidExtension(path_ref.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CLIError::NotFound(path_ref.to_path_buf()));
        }
        Err(e) => return Err(CLIError::Io(e)),
    }

    Ok(fs::canonicalize(path_ref)?)
}

/// Load a stylesheet into a [`StyleUnit`], discovering its source map.
///
/// Discovery order: an explicitly given map file, the stylesheet's
/// `sourceMappingURL` annotation (local paths only), a sibling
/// `<file>.css.map`. A unit with no discoverable map is still loaded; the
/// pipeline applies the configured policy to it.
pub fn load_unit(path: &Path, explicit_map: Option<&Path>) -> Result<StyleUnit, CLIError> {
    let css_path = validate_css_path(path)?;
    let contents = fs::read_to_string(&css_path)?;
    let css_dir = css_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    let map_path = match explicit_map {
        Some(p) => Some(p.to_path_buf()),
        None => discover_map_path(&css_path, &css_dir, &contents),
    };

    let (source_map, base) = match map_path {
        Some(map_path) => {
            let json = fs::read_to_string(&map_path)
                .map_err(|_| CLIError::UnreadableMap(map_path.clone()))?;
            // Relative `sources` entries resolve against the map file's
            // own directory.
            let base = map_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| css_dir.clone());
            (Some(MapPayload::Json(json)), base)
        }
        None => (None, css_dir.clone()),
    };

    Ok(StyleUnit::new(css_path, base, contents, source_map))
}

fn discover_map_path(css_path: &Path, css_dir: &Path, contents: &str) -> Option<PathBuf> {
    if let Some(url) = find_annotation(contents) {
        // Remote and inline data annotations are out of scope.
        if !url.contains("://") && !url.starts_with("data:") {
            let candidate = css_dir.join(&url);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    let file_name = css_path.file_name()?.to_str()?;
    let sibling = css_dir.join(format!("{file_name}.map"));
    sibling.is_file().then_some(sibling)
}

/// Ensure the output directory exists, creating parents as needed.
pub fn ensure_output_dir<P: AsRef<Path>>(output_path: P) -> std::io::Result<()> {
    let path = output_path.as_ref();
    if path.exists() {
        if !path.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::AlreadyExists,
                "output path exists but is not a directory",
            ));
        }
        return Ok(());
    }
    fs::create_dir_all(path)
}

/// Write a processed unit into `out_dir`. A rewritten unit gets its map
/// written alongside and a refreshed annotation; a pass-through unit is
/// copied verbatim. Returns the written stylesheet path.
pub fn write_outcome(outcome: &Outcome, out_dir: &Path) -> Result<PathBuf, CLIError> {
    ensure_output_dir(out_dir)?;
    let unit = outcome.unit();
    let file_name = unit
        .path
        .file_name()
        .ok_or_else(|| CLIError::NotFound(unit.path.clone()))?;
    let css_out = out_dir.join(file_name);

    match outcome {
        Outcome::Rewritten(unit) => {
            let map_name = format!("{}.map", file_name.to_string_lossy());
            if let Some(MapPayload::Json(json)) = &unit.source_map {
                fs::write(out_dir.join(&map_name), json)?;
            }
            fs::write(&css_out, with_annotation(&unit.contents, &map_name))?;
        }
        Outcome::PassThrough(unit, _) => {
            fs::write(&css_out, &unit.contents)?;
        }
    }
    Ok(css_out)
}
