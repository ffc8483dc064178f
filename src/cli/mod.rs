//! Command-line parsing for the `hank` model-construction tool.
//!
//! Parsing and dispatch live here and in `app`; nothing in this module touches
//! the model code directly.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hank", version, about = "Heterogeneous-agent model construction")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the model once and print its dimensions, grids and steady state.
    Inspect(InspectArgs),
    /// Build one model per prior draw (in parallel) and summarize the outcomes.
    Sweep(SweepArgs),
    /// Print the default model configuration as JSON.
    Defaults,
}

/// Options shared by every command that builds a model.
#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// Model configuration JSON (unknown keys are rejected).
    #[arg(short = 'c', long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Override the number of cash-on-hand grid points.
    #[arg(long)]
    pub nx: Option<usize>,

    /// Override the number of skill grid points.
    #[arg(long)]
    pub ns: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the normalized index ranges of every namespace.
    #[arg(long)]
    pub ranges: bool,

    /// Export the normalized layout, grid settings and steady state to JSON.
    #[arg(long = "export-layout", value_name = "JSON")]
    pub export_layout: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of prior draws.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub draws: usize,

    /// Seed for the prior draws.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export per-draw outcomes to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}
