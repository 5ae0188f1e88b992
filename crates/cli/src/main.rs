use std::path::PathBuf;

use clap::Parser;
use cssrebase_core::{cli_ops, process_many, Options, Outcome};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "Rebase url() references in generated CSS via its source map")]
struct Cli {
    /// Generated stylesheets to process
    #[arg(required = true, value_name = "CSS")]
    inputs: Vec<PathBuf>,

    /// Explicit source map file (single input only; default is annotation
    /// or sibling <file>.css.map discovery)
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Directory to write rewritten stylesheets and maps into
    #[arg(long, value_name = "DIR", default_value = "out")]
    out_dir: PathBuf,

    /// Emit absolute paths instead of relative ones
    #[arg(long)]
    absolute: bool,

    /// Preserve ?query/#fragment suffixes on rewritten urls
    #[arg(long)]
    keep_query: bool,

    /// Forward units unmodified on rebase errors instead of failing
    #[arg(long)]
    no_fail: bool,

    /// With --no-fail, drop the pass-through warnings as well
    #[arg(long)]
    silent: bool,

    /// Extra search root for root-relative url() references
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Let --root also serve as a fallback for ordinary relative urls
    #[arg(long)]
    include_root: bool,

    /// Cap on candidate locations listed in diagnostics (0 = all)
    #[arg(long, default_value_t = 0)]
    attempts: usize,

    /// Trace every url resolution at debug level
    #[arg(long)]
    debug: bool,

    /// Print the per-unit summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct UnitReport {
    input: String,
    output: Option<String>,
    status: &'static str,
    message: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.map.is_some() && cli.inputs.len() > 1 {
        eprintln!("--map can only be combined with a single input");
        std::process::exit(2);
    }

    let opts = Options {
        absolute: cli.absolute,
        fail: !cli.no_fail,
        silent: cli.silent,
        keep_query: cli.keep_query,
        attempts: cli.attempts,
        debug: cli.debug,
        root: cli.root.clone(),
        include_root: cli.include_root,
    };

    let mut reports: Vec<UnitReport> = Vec::new();
    let mut units = Vec::new();
    let mut loaded_inputs = Vec::new();
    for input in &cli.inputs {
        match cli_ops::load_unit(input, cli.map.as_deref()) {
            Ok(unit) => {
                units.push(unit);
                loaded_inputs.push(input.display().to_string());
            }
            Err(e) => {
                log::error!("{}: {e}", input.display());
                reports.push(UnitReport {
                    input: input.display().to_string(),
                    output: None,
                    status: "failed",
                    message: Some(e.to_string()),
                });
            }
        }
    }

    for (input, result) in loaded_inputs.into_iter().zip(process_many(units, &opts)) {
        let report = match result {
            Ok(outcome) => match cli_ops::write_outcome(&outcome, &cli.out_dir) {
                Ok(written) => UnitReport {
                    input,
                    output: Some(written.display().to_string()),
                    status: match &outcome {
                        Outcome::Rewritten(_) => "rewritten",
                        Outcome::PassThrough(..) => "pass-through",
                    },
                    message: match outcome {
                        Outcome::PassThrough(_, diagnostic) => diagnostic,
                        Outcome::Rewritten(_) => None,
                    },
                },
                Err(e) => {
                    log::error!("{input}: {e}");
                    UnitReport {
                        input,
                        output: None,
                        status: "failed",
                        message: Some(e.to_string()),
                    }
                }
            },
            Err(e) => {
                log::error!("{input}: {e}");
                UnitReport {
                    input,
                    output: None,
                    status: "failed",
                    message: Some(e.to_string()),
                }
            }
        };
        reports.push(report);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports).expect("report serialization"));
    } else {
        for report in &reports {
            match &report.output {
                Some(output) => println!("{} -> {} ({})", report.input, output, report.status),
                None => println!("{} ({})", report.input, report.status),
            }
        }
    }

    if reports.iter().any(|r| r.status == "failed") {
        std::process::exit(1);
    }
}
