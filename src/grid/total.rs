//! Cross-product (cash × skill) grid.
//!
//! Layout is skill-major: point `j·nx + i` pairs cash node `i` with skill node
//! `j`, so each skill state owns a contiguous slice of `nx` points. Weights
//! are products of the marginal weights.

use nalgebra::DVector;
use serde::Serialize;

use crate::grid::cash::CashGrid;
use crate::grid::skill::SkillGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct TotalGrid {
    nx: usize,
    ns: usize,
    cash: DVector<f64>,
    skill: DVector<f64>,
    weights: DVector<f64>,
}

impl TotalGrid {
    pub fn new(cash: &CashGrid, skill: &SkillGrid) -> Self {
        let nx = cash.len();
        let ns = skill.len();
        let n = nx * ns;
        let cash_nodes = DVector::from_fn(n, |k, _| cash.nodes()[k % nx]);
        let skill_nodes = DVector::from_fn(n, |k, _| skill.nodes()[k / nx]);
        let weights = DVector::from_fn(n, |k, _| skill.weights()[k / nx] * cash.weights()[k % nx]);
        Self {
            nx,
            ns,
            cash: cash_nodes,
            skill: skill_nodes,
            weights,
        }
    }

    pub fn len(&self) -> usize {
        self.nx * self.ns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ns(&self) -> usize {
        self.ns
    }

    /// Flat index of cash node `ix` in skill state `is`.
    pub fn index(&self, ix: usize, is: usize) -> usize {
        is * self.nx + ix
    }

    pub fn cash_nodes(&self) -> &DVector<f64> {
        &self.cash
    }

    pub fn skill_nodes(&self) -> &DVector<f64> {
        &self.skill
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Total weights restricted to skill state `is` (zero elsewhere).
    pub fn skill_marginal_weights(&self, is: usize) -> DVector<f64> {
        DVector::from_fn(self.len(), |k, _| {
            if k / self.nx == is { self.weights[k] } else { 0.0 }
        })
    }
}

/// Grid scalars that equation construction reuses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSettings {
    pub xlo: f64,
    pub xhi: f64,
    pub xscale: f64,
    pub sscale: f64,
}

impl GridSettings {
    pub fn new(cash: &CashGrid, skill: &SkillGrid) -> Self {
        let bounds = cash.bounds();
        Self {
            xlo: bounds.xlo,
            xhi: bounds.xhi,
            xscale: cash.scale(),
            sscale: skill.scale(),
        }
    }
}
