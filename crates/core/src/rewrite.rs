use std::path::Path;

use thiserror::Error;

use crate::css::{Declaration, Node, Stylesheet};
use crate::options::Options;
use crate::path_resolve::{relative_from, resolve_absolute, to_slash};
use crate::sm_reverse::ReverseIndex;
use crate::url_split::{split, Segment};

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error(
        "no source-map entry for declaration '{property}' at {}:{}",
        .line + 1, .column + 1
    )]
    MissingMapping {
        property: String,
        line: u32,
        column: u32,
    },
}

/// Visit every declaration in document order, recursing into nested rule
/// groups, and rewrite the ones that carry `url()` references. Returns the
/// number of tokens rewritten.
pub fn rewrite_stylesheet(
    sheet: &mut Stylesheet,
    index: &ReverseIndex,
    generated_dir: &Path,
    opts: &Options,
) -> Result<usize, RewriteError> {
    walk_nodes(&mut sheet.nodes, index, generated_dir, opts)
}

fn walk_nodes(
    nodes: &mut [Node],
    index: &ReverseIndex,
    generated_dir: &Path,
    opts: &Options,
) -> Result<usize, RewriteError> {
    let mut rewritten = 0;
    for node in nodes {
        match node {
            Node::Declaration(decl) => {
                // Cheap substring filter; the splitter does the real match.
                if decl.value.contains("url") {
                    rewritten += rewrite_declaration(decl, index, generated_dir, opts)?;
                }
            }
            Node::Rule { body, .. } => {
                rewritten += walk_nodes(body, index, generated_dir, opts)?;
            }
            Node::AtRule { body: Some(body), .. } => {
                rewritten += walk_nodes(body, index, generated_dir, opts)?;
            }
            Node::AtRule { body: None, .. } | Node::Comment { .. } => {}
        }
    }
    Ok(rewritten)
}

fn rewrite_declaration(
    decl: &mut Declaration,
    index: &ReverseIndex,
    generated_dir: &Path,
    opts: &Options,
) -> Result<usize, RewriteError> {
    // Every token in one declaration originates from the same file, so the
    // declaration's start position stands in for all of them. A url-bearing
    // declaration the map cannot account for means the map is unusable.
    let origin_dir = index
        .original_dir_for(decl.pos.line, decl.pos.column)
        .ok_or_else(|| RewriteError::MissingMapping {
            property: decl.property.clone(),
            line: decl.pos.line,
            column: decl.pos.column,
        })?;

    let mut rewritten = 0;
    let mut value = String::new();
    for segment in split(&decl.value) {
        match segment {
            Segment::Literal(text) => value.push_str(&text),
            Segment::Url(token) => {
                let resolution =
                    resolve_absolute(&origin_dir, &token.path, opts.root.as_deref(), opts.include_root);
                match resolution.found {
                    Some(target) => {
                        if opts.absolute {
                            value.push_str(&to_slash(&target));
                        } else {
                            value.push_str(&to_slash(&relative_from(&target, generated_dir)));
                        }
                        if opts.keep_query {
                            if let Some(suffix) = &token.suffix {
                                value.push_str(suffix);
                            }
                        }
                        rewritten += 1;
                        if opts.debug {
                            log::debug!("resolved url({}) via {}", token.path, origin_dir.display());
                        }
                    }
                    None => {
                        // Best effort: an unresolved asset is left untouched.
                        value.push_str(&token.original_text());
                        if opts.debug {
                            let shown = if opts.attempts > 0 {
                                opts.attempts.min(resolution.tried.len())
                            } else {
                                resolution.tried.len()
                            };
                            let tried: Vec<String> = resolution.tried[..shown]
                                .iter()
                                .map(|p| p.display().to_string())
                                .collect();
                            log::debug!(
                                "could not resolve url({}), tried {} location(s): {}",
                                token.path,
                                resolution.tried.len(),
                                tried.join(", ")
                            );
                        }
                    }
                }
            }
        }
    }
    decl.value = value;
    Ok(rewritten)
}
