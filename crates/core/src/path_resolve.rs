use std::path::{Component, Path, PathBuf};

/// Outcome of probing the candidate locations for one reference. `tried`
/// keeps the probe order for diagnostics.
pub struct Resolution {
    pub found: Option<PathBuf>,
    pub tried: Vec<PathBuf>,
}

/// Resolve `.` and `..` components lexically, without touching the
/// file system or following symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }
    components.iter().collect()
}

/// Locate the file a `url()` reference points at.
///
/// A reference with a leading separator is root-relative: it resolves only
/// against `root` (when configured). Anything else resolves against
/// `base_dir`, with `root` as an extra fallback candidate when
/// `include_root` is set. The first candidate that exists wins; none
/// existing is not an error here.
pub fn resolve_absolute(
    base_dir: &Path,
    reference: &str,
    root: Option<&Path>,
    include_root: bool,
) -> Resolution {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if reference.starts_with('/') || reference.starts_with('\\') {
        let trimmed = reference.trim_start_matches(['/', '\\']);
        if let Some(root) = root {
            candidates.push(root.join(trimmed));
        }
    } else {
        candidates.push(base_dir.join(reference));
        if include_root {
            if let Some(root) = root {
                candidates.push(root.join(reference));
            }
        }
    }

    let mut tried = Vec::new();
    for candidate in candidates {
        let candidate = normalize_path(&candidate);
        if candidate.is_file() {
            return Resolution { found: Some(candidate), tried };
        }
        tried.push(candidate);
    }
    Resolution { found: None, tried }
}

/// Express `target` relative to the directory `base_dir`. Both inputs are
/// absolute and normalized. Falls back to the absolute target when the two
/// share no common prefix (e.g. different drives).
pub fn relative_from(target: &Path, base_dir: &Path) -> PathBuf {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base_dir.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return target.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part);
    }
    rel
}

/// Render a path with forward slashes regardless of host platform.
pub fn to_slash(path: &Path) -> String {
    let rendered = path.display().to_string();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
