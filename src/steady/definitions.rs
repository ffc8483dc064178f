//! Closed-form steady state of the HANK model.

use serde::Serialize;

use crate::error::AppError;
use crate::grid::Prices;
use crate::params::ParameterSet;
use crate::steady::graph::{Definition, SteadyState, SteadyStateGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SsKey {
    RealRate,
    RentalRate,
    Wage,
    CapitalLaborRatio,
    Capital,
    Investment,
    Output,
    Consumption,
    GovDebt,
    Transfers,
}

impl SsKey {
    pub fn name(self) -> &'static str {
        match self {
            SsKey::RealRate => "R",
            SsKey::RentalRate => "rk",
            SsKey::Wage => "w",
            SsKey::CapitalLaborRatio => "klrat",
            SsKey::Capital => "k",
            SsKey::Investment => "i",
            SsKey::Output => "y",
            SsKey::Consumption => "c",
            SsKey::GovDebt => "b",
            SsKey::Transfers => "T",
        }
    }
}

impl std::fmt::Display for SsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters the steady state reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateInputs {
    /// Gross real rate.
    pub r_star: f64,
    pub alpha: f64,
    pub delta: f64,
    /// Aggregate efficiency hours.
    pub h_star: f64,
    /// Debt-to-output ratio.
    pub eta: f64,
    /// Government spending share of output.
    pub g_star: f64,
    /// Tax share of output.
    pub tau_star: f64,
}

impl SteadyStateInputs {
    pub fn from_parameters(params: &ParameterSet) -> Result<Self, AppError> {
        Ok(Self {
            r_star: params.value("r_star")?,
            alpha: params.value("alpha")?,
            delta: params.value("delta")?,
            h_star: params.value("h_star")?,
            eta: params.value("eta")?,
            g_star: params.value("g_star")?,
            tau_star: params.value("tau_star")?,
        })
    }
}

const HANK_DEFINITIONS: [Definition; 10] = [
    Definition {
        key: SsKey::RealRate,
        deps: &[],
        eval: |p, _| p.r_star,
    },
    Definition {
        key: SsKey::RentalRate,
        deps: &[SsKey::RealRate],
        eval: |p, d| d[0] + p.delta - 1.0,
    },
    Definition {
        key: SsKey::Wage,
        deps: &[SsKey::RentalRate],
        eval: |p, d| {
            let a = p.alpha;
            a.powf(a / (1.0 - a)) * (1.0 - a) * d[0].powf(-a / (1.0 - a))
        },
    },
    Definition {
        key: SsKey::CapitalLaborRatio,
        deps: &[SsKey::Wage, SsKey::RentalRate],
        eval: |p, d| p.alpha / (1.0 - p.alpha) * d[0] / d[1],
    },
    Definition {
        key: SsKey::Capital,
        deps: &[SsKey::CapitalLaborRatio],
        eval: |p, d| d[0] * p.h_star,
    },
    Definition {
        key: SsKey::Investment,
        deps: &[SsKey::Capital],
        eval: |p, d| p.delta * d[0],
    },
    Definition {
        key: SsKey::Output,
        deps: &[SsKey::Capital],
        eval: |p, d| d[0].powf(p.alpha) * p.h_star.powf(1.0 - p.alpha),
    },
    Definition {
        key: SsKey::Consumption,
        deps: &[SsKey::Output, SsKey::Investment],
        eval: |p, d| d[0] - d[1] - p.g_star * d[0],
    },
    Definition {
        key: SsKey::GovDebt,
        deps: &[SsKey::Output],
        eval: |p, d| p.eta * d[0],
    },
    Definition {
        key: SsKey::Transfers,
        deps: &[SsKey::Output, SsKey::GovDebt, SsKey::RealRate],
        eval: |p, d| (p.tau_star - p.g_star) * d[0] - (d[2] - 1.0) * d[1],
    },
];

/// The model's steady-state graph.
pub fn hank_steady_state_graph() -> Result<SteadyStateGraph, AppError> {
    SteadyStateGraph::new(HANK_DEFINITIONS.to_vec())
}

/// Evaluate the steady state for a parameter set.
pub fn solve_steady_state(params: &ParameterSet) -> Result<SteadyState, AppError> {
    let inputs = SteadyStateInputs::from_parameters(params)?;
    Ok(hank_steady_state_graph()?.evaluate(&inputs))
}

impl SteadyState {
    /// Prices the household budget depends on.
    pub fn prices(&self) -> Result<Prices, AppError> {
        Ok(Prices {
            wage: self.get(SsKey::Wage)?,
            real_rate: self.get(SsKey::RealRate)?,
            transfers: self.get(SsKey::Transfers)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> SteadyStateInputs {
        SteadyStateInputs {
            r_star: 1.01,
            alpha: 0.3,
            delta: 0.03,
            h_star: 1.0,
            eta: 0.5,
            g_star: 0.2,
            tau_star: 0.25,
        }
    }

    #[test]
    fn hank_graph_is_well_ordered() {
        let graph = hank_steady_state_graph().unwrap();
        assert_eq!(graph.keys().count(), 10);
    }

    #[test]
    fn steady_state_satisfies_firm_and_government_conditions() {
        let p = inputs();
        let ss = hank_steady_state_graph().unwrap().evaluate(&p);
        assert!(ss.is_finite());

        let rk = ss.get(SsKey::RentalRate).unwrap();
        let w = ss.get(SsKey::Wage).unwrap();
        let k = ss.get(SsKey::Capital).unwrap();
        let y = ss.get(SsKey::Output).unwrap();
        let b = ss.get(SsKey::GovDebt).unwrap();

        assert!((rk - 0.04).abs() < 1e-14);
        // Factor prices equal marginal products.
        assert!((rk - p.alpha * y / k).abs() < 1e-12);
        assert!((w - (1.0 - p.alpha) * y / p.h_star).abs() < 1e-12);
        // Resource constraint.
        let c = ss.get(SsKey::Consumption).unwrap();
        let i = ss.get(SsKey::Investment).unwrap();
        assert!((y - c - i - p.g_star * y).abs() < 1e-12);
        // Government budget: tax revenue covers spending, transfers and interest.
        let t = ss.get(SsKey::Transfers).unwrap();
        assert!((p.tau_star * y - p.g_star * y - t - (p.r_star - 1.0) * b).abs() < 1e-12);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let graph = hank_steady_state_graph().unwrap();
        let a = graph.evaluate(&inputs());
        let b = graph.evaluate(&inputs());
        for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
            assert_eq!(ka, kb);
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn unit_capital_share_propagates_non_finite_values() {
        let p = SteadyStateInputs {
            alpha: 1.0,
            ..inputs()
        };
        let ss = hank_steady_state_graph().unwrap().evaluate(&p);
        assert!(!ss.is_finite());
        assert!(ss.non_finite().contains(&SsKey::Wage));
        // Values upstream of the singularity are untouched.
        assert!(ss.get(SsKey::RentalRate).unwrap().is_finite());
    }

    #[test]
    fn prices_come_from_the_steady_state() {
        let ss = hank_steady_state_graph().unwrap().evaluate(&inputs());
        let prices = ss.prices().unwrap();
        assert_eq!(prices.real_rate, 1.01);
        assert_eq!(prices.wage, ss.get(SsKey::Wage).unwrap());
    }
}
