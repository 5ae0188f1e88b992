pub mod annotation;
pub mod cli_ops;
pub mod css;
pub mod options;
pub mod path_resolve;
pub mod pipeline;
pub mod rewrite;
pub mod sm_reverse;
pub mod unit;
pub mod url_split;

pub use options::{Options, OptionsError};
pub use pipeline::{process, process_many, Outcome, RebaseError};
pub use unit::{MapPayload, StyleUnit};
