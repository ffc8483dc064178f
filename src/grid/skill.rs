//! Persistent skill process as a finite Markov chain.
//!
//! With two states the chain is exact: low/high skill with switching
//! probabilities `p_lh` (low → high) and `p_hl` (high → low), and
//! `s_high = skill_ratio · s_low`.
//!
//! With more states we Tauchen-discretize log skill as an AR(1) whose
//! persistence `ρ = 1 − p_lh − p_hl` matches the two-state chain. Nodes are
//! equally spaced on `[−λσ_y, λσ_y]` and `σ_y` is chosen so that the extreme
//! nodes keep the requested high/low ratio: `exp(2λσ_y) = skill_ratio`.
//!
//! Either way nodes are rescaled to have stationary mean one; the rescaling
//! factor is the grid's `scale`.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::{normal_cdf, stationary_distribution};

/// Row sums must be within this distance of one.
const ROW_SUM_TOL: f64 = 1e-10;

/// Inputs to the skill discretization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillProcess {
    /// High/low skill ratio `s_high / s_low` (> 1).
    pub skill_ratio: f64,
    /// Probability of moving from low to high skill.
    pub p_lh: f64,
    /// Probability of moving from high to low skill.
    pub p_hl: f64,
}

/// Discretized skill grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillGrid {
    nodes: DVector<f64>,
    weights: DVector<f64>,
    transition: DMatrix<f64>,
    scale: f64,
}

impl SkillGrid {
    /// Discretize `process` on `ns` states; `lambda` is the Tauchen spread.
    pub fn build(process: &SkillProcess, ns: usize, lambda: f64) -> Result<Self, AppError> {
        if !(process.skill_ratio.is_finite() && process.skill_ratio > 1.0) {
            return Err(AppError::config(format!(
                "skill_ratio must be finite and > 1 (got {}).",
                process.skill_ratio
            )));
        }
        match ns {
            0 | 1 => Err(AppError::config(format!("Skill grid needs ns >= 2 (got {ns})."))),
            2 => {
                let (p_lh, p_hl) = (process.p_lh, process.p_hl);
                let transition =
                    DMatrix::from_row_slice(2, 2, &[1.0 - p_lh, p_lh, p_hl, 1.0 - p_hl]);
                let nodes = DVector::from_row_slice(&[1.0, process.skill_ratio]);
                Self::from_chain(nodes, transition)
            }
            _ => {
                let (nodes, transition) = tauchen(process, ns, lambda)?;
                Self::from_chain(nodes, transition)
            }
        }
    }

    /// Build from explicit (unscaled) nodes and a transition matrix.
    ///
    /// The matrix must be row-stochastic and primitive (irreducible and
    /// aperiodic) so that the stationary weights are unique.
    pub fn from_chain(nodes: DVector<f64>, transition: DMatrix<f64>) -> Result<Self, AppError> {
        let ns = nodes.len();
        if ns == 0 {
            return Err(AppError::config("Skill grid needs at least one node."));
        }
        if transition.shape() != (ns, ns) {
            return Err(AppError::config(format!(
                "Transition matrix is {:?}, expected {ns}x{ns}.",
                transition.shape()
            )));
        }
        validate_row_stochastic(&transition)?;
        if !is_primitive(&transition) {
            return Err(AppError::config(
                "Skill transition matrix is reducible or periodic; stationary weights are not unique.",
            ));
        }

        let weights = stationary_distribution(&transition)
            .ok_or_else(|| AppError::config("Failed to solve for stationary skill weights."))?;

        let mean = nodes.dot(&weights);
        if !(mean.is_finite() && mean > 0.0) {
            return Err(AppError::config("Skill nodes must have a positive stationary mean."));
        }
        let scale = 1.0 / mean;

        Ok(Self {
            nodes: nodes * scale,
            weights,
            transition,
            scale,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mean-one skill levels, ascending.
    pub fn nodes(&self) -> &DVector<f64> {
        &self.nodes
    }

    /// Stationary probabilities.
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Row-stochastic transition matrix (`row = today`, `column = tomorrow`).
    pub fn transition(&self) -> &DMatrix<f64> {
        &self.transition
    }

    /// Factor applied to the raw nodes to give them stationary mean one.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn lowest(&self) -> f64 {
        self.nodes[0]
    }

    pub fn highest(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }
}

fn validate_row_stochastic(transition: &DMatrix<f64>) -> Result<(), AppError> {
    for (i, row) in transition.row_iter().enumerate() {
        if row.iter().any(|p| !(p.is_finite() && *p >= 0.0 && *p <= 1.0)) {
            return Err(AppError::config(format!(
                "Transition row {i} has entries outside [0, 1]."
            )));
        }
        let total = row.sum();
        if (total - 1.0).abs() > ROW_SUM_TOL {
            return Err(AppError::config(format!(
                "Transition row {i} sums to {total}, not 1."
            )));
        }
    }
    Ok(())
}

/// A non-negative matrix is primitive iff some power is strictly positive;
/// Wielandt's bound says checking up to `(n − 1)² + 1` suffices.
fn is_primitive(transition: &DMatrix<f64>) -> bool {
    let n = transition.nrows();
    let pattern = transition.map(|p| p > 0.0);
    let mut power = pattern.clone();
    let max_power = (n - 1) * (n - 1) + 1;
    for _ in 1..max_power {
        if power.iter().all(|&b| b) {
            return true;
        }
        power = bool_product(&power, &pattern);
    }
    power.iter().all(|&b| b)
}

fn bool_product(a: &DMatrix<bool>, b: &DMatrix<bool>) -> DMatrix<bool> {
    let n = a.nrows();
    DMatrix::from_fn(n, n, |i, j| (0..n).any(|k| a[(i, k)] && b[(k, j)]))
}

/// Tauchen discretization of log skill. Returns raw (unscaled) nodes.
fn tauchen(process: &SkillProcess, ns: usize, lambda: f64) -> Result<(DVector<f64>, DMatrix<f64>), AppError> {
    let (p_lh, p_hl) = (process.p_lh, process.p_hl);
    if !(p_lh > 0.0 && p_lh < 1.0 && p_hl > 0.0 && p_hl < 1.0) {
        return Err(AppError::config(format!(
            "Switching probabilities must lie in (0, 1) (got p_lh={p_lh}, p_hl={p_hl})."
        )));
    }
    let rho = 1.0 - p_lh - p_hl;
    let sigma_y = process.skill_ratio.ln() / (2.0 * lambda);
    let sigma_e = sigma_y * (1.0 - rho * rho).sqrt();

    let top = lambda * sigma_y;
    let step = 2.0 * top / (ns as f64 - 1.0);
    let log_nodes: Vec<f64> = (0..ns).map(|i| -top + step * i as f64).collect();

    let mut transition = DMatrix::<f64>::zeros(ns, ns);
    for i in 0..ns {
        let mean = rho * log_nodes[i];
        for j in 0..ns {
            let upper = if j + 1 < ns {
                normal_cdf((log_nodes[j] + step / 2.0 - mean) / sigma_e)
            } else {
                1.0
            };
            let lower = if j > 0 {
                normal_cdf((log_nodes[j] - step / 2.0 - mean) / sigma_e)
            } else {
                0.0
            };
            transition[(i, j)] = (upper - lower).max(0.0);
        }
        let total = transition.row(i).sum();
        transition.row_mut(i).unscale_mut(total);
    }

    let nodes = DVector::from_iterator(ns, log_nodes.into_iter().map(f64::exp));
    Ok((nodes, transition))
}
