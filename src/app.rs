//! Top-level application orchestration.
//!
//! `src/main.rs` only installs logging; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the model configuration
//! - builds the model (or sweeps prior draws)
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, InspectArgs, SweepArgs};
use crate::error::AppError;
use crate::model::Construction;

pub mod pipeline;

/// Entry point for the `hank` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Inspect(args) => handle_inspect(args),
        Command::Sweep(args) => handle_sweep(args),
        Command::Defaults => handle_defaults(),
    }
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let config = pipeline::resolve_config(&args.config)?;

    match pipeline::run_construct(&config)? {
        Construction::Built(model) => {
            println!("{}", crate::report::format_model_summary(&model));
            if args.ranges {
                println!("{}", crate::report::format_ranges(&model.registry));
            }
            if let Some(path) = &args.export_layout {
                crate::io::write_layout_json(path, &model)?;
            }
            Ok(())
        }
        Construction::Rejected(rejection) => {
            print!("{}", crate::report::format_rejection(&rejection));
            Err(AppError::infeasible(rejection.reason))
        }
    }
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    let config = pipeline::resolve_config(&args.config)?;
    let out = pipeline::run_sweep(&config, args.draws, args.seed)?;

    println!(
        "{}",
        crate::report::format_sweep_summary(&out.summary, &out.outcomes)
    );
    if let Some(path) = &args.export {
        crate::io::write_sweep_json(path, args.seed, &out.summary, &out.outcomes)?;
    }
    Ok(())
}

fn handle_defaults() -> Result<(), AppError> {
    let config = crate::domain::ModelConfig::default();
    println!("{}", crate::io::config_to_json(&config)?);
    Ok(())
}

/// Rewrite argv so a bare `hank` (or `hank --nx 50 ...`) means `hank inspect`.
///
/// Rules:
/// - `hank`                       -> `hank inspect`
/// - `hank --nx 50 ...`           -> `hank inspect --nx 50 ...`
/// - `hank --help/--version/-h`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("inspect".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "inspect".to_string());
    }
    argv
}
