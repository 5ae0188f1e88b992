use std::path::PathBuf;

use rayon::prelude::*;
use sourcemap::{SourceMap, SourceMapBuilder};
use thiserror::Error;

use crate::css::{self, CssError, Serialized};
use crate::options::{Options, OptionsError};
use crate::rewrite::{rewrite_stylesheet, RewriteError};
use crate::sm_reverse::ReverseIndex;
use crate::unit::{MapPayload, StyleUnit};

#[derive(Error, Debug)]
pub enum RebaseError {
    #[error("no source map present on {}", .0.display())]
    MissingSourceMap(PathBuf),
    #[error("invalid source map on {}: {source}", .path.display())]
    InvalidSourceMap {
        path: PathBuf,
        source: sourcemap::Error,
    },
    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),
    /// Malformed CSS. Always propagated to the caller, never routed
    /// through the fail/silent gate.
    #[error(transparent)]
    Css(#[from] CssError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("failed to encode output source map: {0}")]
    MapEncode(sourcemap::Error),
    #[error("failed to adjust output source map: {0}")]
    MapAdjust(#[from] serde_json::Error),
}

/// Result of processing one unit under the three-tier error policy.
/// Fatal errors surface as `Err` from [`process`]; the pass-through tiers
/// hand the unit back unmodified, with the diagnostic that would have been
/// fatal when not silenced.
#[derive(Debug)]
pub enum Outcome {
    Rewritten(StyleUnit),
    PassThrough(StyleUnit, Option<String>),
}

impl Outcome {
    pub fn unit(&self) -> &StyleUnit {
        match self {
            Outcome::Rewritten(unit) | Outcome::PassThrough(unit, _) => unit,
        }
    }

    pub fn into_unit(self) -> StyleUnit {
        match self {
            Outcome::Rewritten(unit) | Outcome::PassThrough(unit, _) => unit,
        }
    }
}

/// Rebase every `url()` reference in one generated stylesheet.
///
/// Pipeline: validate the map and options, parse the CSS, rewrite
/// declarations against the reverse lookup, reprint with a merged output
/// map. The error policy is evaluated here, once, at the boundary.
pub fn process(mut unit: StyleUnit, opts: &Options) -> Result<Outcome, RebaseError> {
    let payload = match unit.source_map.take() {
        Some(payload) => payload,
        None => {
            let err = RebaseError::MissingSourceMap(unit.path.clone());
            return gate(unit, opts, err);
        }
    };

    // Keep the raw JSON around so a pass-through can hand the unit back
    // byte-identical.
    let (map, raw_json) = match payload {
        MapPayload::Json(json) => match SourceMap::from_slice(json.as_bytes()) {
            Ok(map) => (map, Some(json)),
            Err(source) => {
                let err = RebaseError::InvalidSourceMap { path: unit.path.clone(), source };
                unit.source_map = Some(MapPayload::Json(json));
                return gate(unit, opts, err);
            }
        },
        MapPayload::Parsed(map) => (map, None),
    };

    match run(&unit, &map, opts) {
        Ok((code, map_json)) => {
            unit.contents = code;
            unit.source_map = Some(MapPayload::Json(map_json));
            Ok(Outcome::Rewritten(unit))
        }
        Err(err) => {
            unit.source_map = Some(match raw_json {
                Some(json) => MapPayload::Json(json),
                None => MapPayload::Parsed(map),
            });
            if matches!(err, RebaseError::Css(_)) {
                return Err(err);
            }
            gate(unit, opts, err)
        }
    }
}

/// Process independent units in parallel, returning per-unit results in
/// input order.
pub fn process_many(units: Vec<StyleUnit>, opts: &Options) -> Vec<Result<Outcome, RebaseError>> {
    units
        .into_par_iter()
        .map(|unit| process(unit, opts))
        .collect()
}

fn run(unit: &StyleUnit, map: &SourceMap, opts: &Options) -> Result<(String, String), RebaseError> {
    // Root validation happens before any CSS parsing.
    opts.validate()?;

    let mut sheet = css::parse(&unit.contents)?;
    let index = ReverseIndex::new(map, &unit.base);
    let rewritten = rewrite_stylesheet(&mut sheet, &index, &unit.dir(), opts)?;
    if opts.debug {
        log::debug!(
            "rewrote {} url token(s) in {}",
            rewritten,
            unit.path.display()
        );
    }

    let serialized = css::serialize(&sheet);
    let map_json = build_output_map(&serialized, map, unit)?;
    Ok((serialized.code, map_json))
}

/// Build the output map by folding each emitted node's input position
/// through the input map: generated' -> generated -> original. Sources are
/// re-expressed relative to the input `sourceRoot`, which is restored on
/// the emitted map, together with any embedded `sourcesContent`.
fn build_output_map(
    serialized: &Serialized,
    input_map: &SourceMap,
    unit: &StyleUnit,
) -> Result<String, RebaseError> {
    let file = unit.path.file_name().and_then(|name| name.to_str());
    let root = input_map.get_source_root().unwrap_or("");
    let mut builder = SourceMapBuilder::new(file);

    for span in &serialized.spans {
        let Some(token) = input_map.lookup_token(span.input.line, span.input.column) else {
            continue;
        };
        let Some(source) = token.get_source() else {
            continue;
        };
        if source.is_empty() {
            continue;
        }
        let source = root_relative(source, root);
        let src_id = builder.add_source(source);
        builder.set_source_contents(src_id, input_map.get_source_contents(token.get_src_id()));
        builder.add(
            span.out.line,
            span.out.column,
            token.get_src_line(),
            token.get_src_col(),
            Some(source),
            token.get_name(),
            false,
        );
    }

    let map = builder.into_sourcemap();
    let mut buf = Vec::new();
    map.to_writer(&mut buf).map_err(RebaseError::MapEncode)?;

    // Re-attach the sourceRoot the emitted sources are relative to.
    let mut value: serde_json::Value = serde_json::from_slice(&buf)?;
    if !root.is_empty() {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("sourceRoot".to_string(), serde_json::Value::String(root.to_string()));
        }
    }
    Ok(serde_json::to_string(&value)?)
}

/// Parsed maps hand sources back with `sourceRoot` and its joiner
/// separator already folded in; undo that so the emitted entries stay
/// relative to the restored root.
fn root_relative<'s>(source: &'s str, root: &str) -> &'s str {
    if root.is_empty() {
        return source;
    }
    match source.strip_prefix(root) {
        Some(rest) if !rest.is_empty() => rest.trim_start_matches(|c| c == '/' || c == '\\'),
        _ => source,
    }
}

fn gate(unit: StyleUnit, opts: &Options, err: RebaseError) -> Result<Outcome, RebaseError> {
    if opts.fail {
        Err(err)
    } else if opts.silent {
        Ok(Outcome::PassThrough(unit, None))
    } else {
        let message = err.to_string();
        log::warn!("{message}");
        Ok(Outcome::PassThrough(unit, Some(message)))
    }
}
