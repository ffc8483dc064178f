//! One-shot model construction.
//!
//! Order matters: the steady state fixes the prices that bound the cash grid,
//! the total grid fixes the adding-up constraints used by the normalizer, and
//! augmented states are placed after the normalized layout.

use tracing::{info, warn};

use crate::domain::ModelConfig;
use crate::error::{AppError, ErrorKind};
use crate::grid::{CashBounds, CashGrid, GridSettings, SkillGrid, SkillProcess, TotalGrid};
use crate::model::variables::{AUGMENTED_STATES, hank_registry};
use crate::normalize::{DofNormalizer, DofSettings, NormalizationMatrices};
use crate::params::ParameterSet;
use crate::registry::NormalizedRegistry;
use crate::steady::{SteadyState, solve_steady_state};

/// A fully constructed model, ready for equation construction.
#[derive(Debug, Clone)]
pub struct HankModel {
    pub config: ModelConfig,
    pub parameters: ParameterSet,
    pub steady_state: SteadyState,
    pub skill: SkillGrid,
    pub cash: CashGrid,
    pub total: TotalGrid,
    pub registry: NormalizedRegistry,
    pub matrices: NormalizationMatrices,
}

impl HankModel {
    /// Rows of `Qx`.
    pub fn n_predetermined_variables(&self) -> usize {
        self.matrices.n_predetermined()
    }

    /// Reduced backward-looking plus jump states.
    pub fn n_model_states(&self) -> usize {
        self.matrices.n_model_states()
    }

    pub fn grid_settings(&self) -> GridSettings {
        GridSettings::new(&self.cash, &self.skill)
    }
}

/// Why a parameter draw produced no model.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub reason: String,
    pub steady_state: SteadyState,
}

#[derive(Debug, Clone)]
pub enum Construction {
    Built(Box<HankModel>),
    Rejected(Rejection),
}

impl Construction {
    pub fn model(&self) -> Option<&HankModel> {
        match self {
            Construction::Built(m) => Some(m),
            Construction::Rejected(_) => None,
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self, Construction::Built(_))
    }
}

/// Build the model for `config` and `params`.
///
/// Structural problems (bad config, unknown parameter, malformed skill chain)
/// are errors. A parameter vector whose steady state cannot support a cash
/// grid is a [`Construction::Rejected`] outcome.
pub fn construct(config: &ModelConfig, params: &ParameterSet) -> Result<Construction, AppError> {
    config.validate()?;
    let registry = hank_registry(config.grid_size())?;

    let steady_state = solve_steady_state(params)?;
    let process = SkillProcess {
        skill_ratio: params.value("skill_ratio")?,
        p_lh: params.value("p_lh")?,
        p_hl: params.value("p_hl")?,
    };
    let skill = SkillGrid::build(&process, config.ns, config.tauchen_lambda)?;

    let bounds = CashBounds::from_prices(
        &steady_state.prices()?,
        params.value("zlo")?,
        &skill,
        config.xhi_multiple,
    );
    let cash = match CashGrid::build(bounds, config.nx) {
        Ok(cash) => cash,
        Err(err) if err.kind() == ErrorKind::Infeasible => {
            let non_finite = steady_state.non_finite();
            warn!(
                reason = err.message(),
                ?non_finite,
                "rejecting parameter draw"
            );
            return Ok(Construction::Rejected(Rejection {
                reason: err.message().to_string(),
                steady_state,
            }));
        }
        Err(err) => return Err(err),
    };
    let total = TotalGrid::new(&cash, &skill);

    let (registry, matrices) =
        DofNormalizer::new(&total, DofSettings::from_config(config)).normalize(registry)?;
    let registry = registry.augment(&AUGMENTED_STATES)?;

    info!(
        grid_points = total.len(),
        endogenous = registry.endogenous_dim(),
        n_model_states = matrices.n_model_states(),
        "constructed model"
    );

    Ok(Construction::Built(Box::new(HankModel {
        config: config.clone(),
        parameters: params.clone(),
        steady_state,
        skill,
        cash,
        total,
        registry,
        matrices,
    })))
}
