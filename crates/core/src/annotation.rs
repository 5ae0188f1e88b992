use once_cell::sync::Lazy;
use regex::Regex;

static ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)/\*#\s*sourceMappingURL=([^*\s]+)\s*\*/\s*$").unwrap()
});

/// Extract the sourceMappingURL from a stylesheet's trailing annotation
/// comment, if present.
pub fn find_annotation(css: &str) -> Option<String> {
    ANNOTATION_RE
        .captures(css)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Drop any sourceMappingURL annotation comment.
pub fn strip_annotation(css: &str) -> String {
    ANNOTATION_RE.replace_all(css, "").into_owned()
}

/// Append a fresh annotation pointing at `map_url`, replacing a stale one.
pub fn with_annotation(css: &str, map_url: &str) -> String {
    let mut out = strip_annotation(css);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("/*# sourceMappingURL={map_url} */\n"));
    out
}
