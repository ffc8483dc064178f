//! Shared construction workflow behind the CLI commands.
//!
//! config file + overrides -> validated config -> default calibration ->
//! construct (or sweep)

use tracing::debug;

use crate::cli::ConfigArgs;
use crate::domain::ModelConfig;
use crate::error::AppError;
use crate::model::{Construction, DrawOutcome, SweepSummary, construct, hank_parameters, sweep};

/// Resolve the model configuration: file (or defaults), then CLI overrides.
pub fn resolve_config(args: &ConfigArgs) -> Result<ModelConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => crate::io::read_config_json(path)?,
        None => ModelConfig::default(),
    };
    if let Some(nx) = args.nx {
        config.nx = nx;
    }
    if let Some(ns) = args.ns {
        config.ns = ns;
    }
    config.validate()?;
    debug!(?config, "resolved model config");
    Ok(config)
}

/// Build the model at the default calibration.
pub fn run_construct(config: &ModelConfig) -> Result<Construction, AppError> {
    let params = hank_parameters()?;
    construct(config, &params)
}

pub struct SweepOutput {
    pub outcomes: Vec<DrawOutcome>,
    pub summary: SweepSummary,
}

pub fn run_sweep(config: &ModelConfig, draws: usize, seed: u64) -> Result<SweepOutput, AppError> {
    let params = hank_parameters()?;
    let outcomes = sweep(config, &params, draws, seed)?;
    let summary = SweepSummary::from_outcomes(&outcomes);
    Ok(SweepOutput { outcomes, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn args(nx: Option<usize>, ns: Option<usize>) -> ConfigArgs {
        ConfigArgs {
            config: None,
            nx,
            ns,
        }
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = resolve_config(&args(Some(40), Some(3))).unwrap();
        assert_eq!((config.nx, config.ns), (40, 3));
        assert_eq!(config.dof_removed_state, 2);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let err = resolve_config(&args(None, Some(1))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn sweep_output_summarizes_all_draws() {
        let config = resolve_config(&args(Some(6), None)).unwrap();
        let out = run_sweep(&config, 4, 9).unwrap();
        assert_eq!(out.summary.draws, 4);
        assert_eq!(out.outcomes.len(), 4);
    }
}
