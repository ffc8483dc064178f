//! Default HANK calibration with priors for the estimated parameters.

use crate::error::AppError;
use crate::params::{Parameter, ParameterSet, ParameterSetBuilder, Prior, Transform};

/// Shock-process names; each gets `rho_<name>` and `sigma_<name>`.
const SHOCK_NAMES: [&str; 7] = ["zp", "z", "g", "bet", "mu_inv", "lamf", "rm"];

pub fn hank_parameters() -> Result<ParameterSet, AppError> {
    let mut b = ParameterSetBuilder::new();

    b.add_parameter(Parameter::free(
        "r_star",
        1.01,
        (1.0, 1.05),
        Prior::Normal {
            mean: 1.01,
            sd: 0.002,
        },
        Transform::Bounded,
        "Steady-state gross real interest rate",
    ))?
    .add_parameter(Parameter::free(
        "alpha",
        0.3,
        (0.0, 1.0),
        Prior::Beta {
            mean: 0.3,
            sd: 0.05,
        },
        Transform::Bounded,
        "Capital share",
    ))?
    .add_parameter(Parameter::fixed("delta", 0.03, "Depreciation rate"))?
    .add_parameter(Parameter::fixed("h_star", 1.0, "Aggregate efficiency hours"))?
    .add_parameter(Parameter::free(
        "eta",
        0.5,
        (0.0, 2.0),
        Prior::Uniform {
            low: 0.1,
            high: 1.5,
        },
        Transform::Bounded,
        "Government debt to output ratio",
    ))?
    .add_parameter(Parameter::fixed("g_star", 0.2, "Government spending share of output"))?
    .add_parameter(Parameter::fixed("tau_star", 0.25, "Tax revenue share of output"))?
    .add_parameter(Parameter::fixed("skill_ratio", 3.0, "High to low skill ratio"))?
    .add_parameter(Parameter::fixed("p_lh", 0.05, "Probability of moving from low to high skill"))?
    .add_parameter(Parameter::fixed("p_hl", 0.1, "Probability of moving from high to low skill"))?
    .add_parameter(Parameter::fixed("zlo", 0.5, "Lowest iid income draw (mean one)"))?;

    for name in SHOCK_NAMES {
        b.add_parameter(Parameter::free(
            &format!("rho_{name}"),
            0.5,
            (0.0, 0.999),
            Prior::Beta { mean: 0.5, sd: 0.2 },
            Transform::Bounded,
            &format!("AR(1) persistence of {name}"),
        ))?
        .add_parameter(Parameter::free(
            &format!("sigma_{name}"),
            0.1,
            (0.0, 5.0),
            Prior::InverseGamma {
                shape: 3.0,
                scale: 0.2,
            },
            Transform::Exponential,
            &format!("Innovation standard deviation of {name}"),
        ))?;
    }

    Ok(b.build())
}
