use once_cell::sync::Lazy;
use regex::Regex;

/// One `url(...)` occurrence per match. The quote characters and the
/// `url(` / `)` framing stay in the surrounding literal text, so only the
/// inner path is captured and everything else survives reassembly
/// untouched.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<uq>[^)]*?))\s*\)"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    None,
    Single,
    Double,
}

/// The path portion of one `url()` occurrence, with any `?query` or
/// `#fragment` tail split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlToken {
    pub path: String,
    pub quote: Quote,
    pub suffix: Option<String>,
}

impl UrlToken {
    /// The exact text the token was cut from.
    pub fn original_text(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", self.path, suffix),
            None => self.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Url(UrlToken),
}

/// Split a declaration value into pass-through literals and url tokens.
/// Concatenating the segments (literals verbatim, tokens via
/// `original_text`) reproduces the input byte for byte.
pub fn split(value: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in URL_RE.captures_iter(value) {
        let (m, quote) = if let Some(m) = caps.name("dq") {
            (m, Quote::Double)
        } else if let Some(m) = caps.name("sq") {
            (m, Quote::Single)
        } else if let Some(m) = caps.name("uq") {
            (m, Quote::None)
        } else {
            continue;
        };

        if m.start() > last_end {
            segments.push(Segment::Literal(value[last_end..m.start()].to_string()));
        }

        let raw = m.as_str();
        let (path, suffix) = match raw.find(['?', '#']) {
            Some(idx) => (&raw[..idx], Some(raw[idx..].to_string())),
            None => (raw, None),
        };
        segments.push(Segment::Url(UrlToken {
            path: path.to_string(),
            quote,
            suffix,
        }));
        last_end = m.end();
    }

    if last_end < value.len() {
        segments.push(Segment::Literal(value[last_end..].to_string()));
    }
    segments
}
