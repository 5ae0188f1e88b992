use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("root option does not resolve to an existing directory: {}", .0.display())]
    InvalidRoot(PathBuf),
}

/// Processing options for one rebase run. All fields default to the
/// conservative behavior: relative output paths, hard failure on error,
/// query/fragment suffixes dropped.
#[derive(Debug, Clone)]
pub struct Options {
    /// Emit absolute file-system paths instead of paths relative to the
    /// generated file's directory.
    pub absolute: bool,
    /// Treat rebase errors as fatal for the unit. When false the unit
    /// passes through unmodified.
    pub fail: bool,
    /// Suppress the warning emitted when `fail` is false.
    pub silent: bool,
    /// Preserve a `?query` / `#fragment` suffix from the original token.
    pub keep_query: bool,
    /// Cap on the number of candidate locations listed in diagnostics.
    /// Zero means list all. Does not change resolution semantics.
    pub attempts: usize,
    /// Emit per-token resolution traces at debug level.
    pub debug: bool,
    /// Extra search root. Root-relative references (`/images/x.png`)
    /// resolve against this directory.
    pub root: Option<PathBuf>,
    /// Let `root` also participate as a fallback candidate for ordinary
    /// relative references, not only root-relative ones.
    pub include_root: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            absolute: false,
            fail: true,
            silent: false,
            keep_query: false,
            attempts: 0,
            debug: false,
            root: None,
            include_root: false,
        }
    }
}

impl Options {
    /// Reject a configuration whose `root` is set but does not exist as a
    /// directory. Must run before any CSS parsing.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if let Some(root) = &self.root {
            if !root.is_dir() {
                return Err(OptionsError::InvalidRoot(root.clone()));
            }
        }
        Ok(())
    }
}
