//! Batch construction over prior draws.
//!
//! Draws are taken sequentially from one seeded generator, so the parameter
//! vectors depend only on the seed. Construction then runs in parallel; each
//! task builds a private model and reports an index-tagged outcome.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::domain::ModelConfig;
use crate::error::{AppError, ErrorKind};
use crate::model::build::{Construction, construct};
use crate::params::ParameterSet;
use crate::steady::SsKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrawOutcome {
    Accepted {
        index: usize,
        n_model_states: usize,
        output: f64,
    },
    Rejected {
        index: usize,
        reason: String,
    },
    Failed {
        index: usize,
        error: String,
    },
}

impl DrawOutcome {
    pub fn index(&self) -> usize {
        match self {
            DrawOutcome::Accepted { index, .. }
            | DrawOutcome::Rejected { index, .. }
            | DrawOutcome::Failed { index, .. } => *index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepSummary {
    pub draws: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl SweepSummary {
    pub fn from_outcomes(outcomes: &[DrawOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                draws: outcomes.len(),
                ..Self::default()
            },
            |mut s, o| {
                match o {
                    DrawOutcome::Accepted { .. } => s.accepted += 1,
                    DrawOutcome::Rejected { .. } => s.rejected += 1,
                    DrawOutcome::Failed { .. } => s.failed += 1,
                }
                s
            },
        )
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.accepted as f64 / self.draws as f64
        }
    }
}

/// Construct one model per prior draw. Outcomes are returned in draw order.
pub fn sweep(
    config: &ModelConfig,
    base: &ParameterSet,
    draws: usize,
    seed: u64,
) -> Result<Vec<DrawOutcome>, AppError> {
    // Configuration problems are shared by every draw; report them once.
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let sampled: Vec<Result<ParameterSet, AppError>> =
        (0..draws).map(|_| base.draw(&mut rng)).collect();

    let mut outcomes: Vec<DrawOutcome> = sampled
        .par_iter()
        .enumerate()
        .map(|(index, draw)| evaluate(config, index, draw))
        .collect();
    outcomes.sort_by_key(DrawOutcome::index);

    let summary = SweepSummary::from_outcomes(&outcomes);
    info!(
        draws = summary.draws,
        accepted = summary.accepted,
        rejected = summary.rejected,
        failed = summary.failed,
        "finished sweep"
    );
    Ok(outcomes)
}

fn evaluate(
    config: &ModelConfig,
    index: usize,
    draw: &Result<ParameterSet, AppError>,
) -> DrawOutcome {
    let params = match draw {
        Ok(p) => p,
        Err(e) if e.kind() == ErrorKind::Infeasible => {
            return DrawOutcome::Rejected {
                index,
                reason: e.message().to_string(),
            };
        }
        Err(e) => {
            return DrawOutcome::Failed {
                index,
                error: e.to_string(),
            };
        }
    };

    match construct(config, params) {
        Ok(Construction::Built(model)) => DrawOutcome::Accepted {
            index,
            n_model_states: model.n_model_states(),
            output: model.steady_state.get(SsKey::Output).unwrap_or(f64::NAN),
        },
        Ok(Construction::Rejected(r)) => DrawOutcome::Rejected {
            index,
            reason: r.reason,
        },
        Err(e) => DrawOutcome::Failed {
            index,
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hank_parameters;
    use crate::params::{Parameter, ParameterSetBuilder, Prior, Transform};

    fn small() -> ModelConfig {
        ModelConfig {
            nx: 8,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn same_seed_gives_same_outcomes() {
        let params = hank_parameters().unwrap();
        let a = sweep(&small(), &params, 6, 42).unwrap();
        let b = sweep(&small(), &params, 6, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.iter().map(DrawOutcome::index).collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn summary_counts_every_draw_once() {
        let outcomes = vec![
            DrawOutcome::Rejected {
                index: 2,
                reason: "x".into(),
            },
            DrawOutcome::Accepted {
                index: 0,
                n_model_states: 3,
                output: 1.0,
            },
            DrawOutcome::Failed {
                index: 1,
                error: "e".into(),
            },
            DrawOutcome::Accepted {
                index: 3,
                n_model_states: 3,
                output: 1.0,
            },
        ];
        let s = SweepSummary::from_outcomes(&outcomes);
        assert_eq!((s.draws, s.accepted, s.rejected, s.failed), (4, 2, 1, 1));
        assert!((s.acceptance_rate() - 0.5).abs() < 1e-12);

        let mut reversed = outcomes.clone();
        reversed.reverse();
        assert_eq!(SweepSummary::from_outcomes(&reversed), s);
    }

    #[test]
    fn infeasible_draws_are_rejected_without_aborting_the_sweep() {
        // Every draw of alpha lands at or above one: no steady-state wage.
        let base = hank_parameters().unwrap();
        let mut b = ParameterSetBuilder::new();
        for p in base.iter() {
            let p = if p.key == "alpha" {
                Parameter::free(
                    "alpha",
                    1.0,
                    (0.0, 2.0),
                    Prior::Uniform {
                        low: 1.0,
                        high: 1.5,
                    },
                    Transform::Identity,
                    "Capital share",
                )
            } else {
                p.clone()
            };
            b.add_parameter(p).unwrap();
        }
        let outcomes = sweep(&small(), &b.build(), 5, 3).unwrap();
        assert_eq!(outcomes.len(), 5);
        let summary = SweepSummary::from_outcomes(&outcomes);
        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.rejected, 5);
    }

    #[test]
    fn invalid_config_fails_up_front() {
        let config = ModelConfig {
            ns: 1,
            ..ModelConfig::default()
        };
        let err = sweep(&config, &hank_parameters().unwrap(), 3, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
