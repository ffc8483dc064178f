//! Cash-on-hand grid.
//!
//! Cash on hand is `x = R·a + w·s·z + T` with assets `a ≥ 0`, skill `s`, an iid
//! income draw `z ~ U[zlo, zhi]` (`zhi = 2 − zlo`, mean one) and net transfers
//! `T`. Bounds:
//!
//! - `xlo = w·zlo·s_min + T` (no assets, worst draws)
//! - `xhi = R·m·y_top + y_top + T` with `y_top = w·zhi·s_max`, i.e. assets up to
//!   `m = xhi_multiple` times the best income draw
//!
//! Bounds are a pure function of prices: a negative or non-finite wage or
//! gross rate, or a negative `xlo`, yields NaN bounds rather than an error so
//! that batch callers can reject the draw with a finiteness check.

use serde::Serialize;

use crate::error::AppError;
use crate::grid::skill::SkillGrid;
use crate::math::gauss_legendre;

/// Steady-state prices entering the household budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub wage: f64,
    /// Gross real rate.
    pub real_rate: f64,
    pub transfers: f64,
}

/// Grid bounds `[xlo, xhi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashBounds {
    pub xlo: f64,
    pub xhi: f64,
}

impl CashBounds {
    /// Bounds implied by `prices`; see the module docs for the formulas.
    pub fn from_prices(prices: &Prices, zlo: f64, skill: &SkillGrid, xhi_multiple: f64) -> Self {
        let wage = positive_or_nan(prices.wage);
        let rate = positive_or_nan(prices.real_rate);
        let zhi = 2.0 - zlo;

        let floor = wage * zlo * skill.lowest() + prices.transfers;
        // NaN fails the comparison and stays NaN.
        let xlo = if floor >= 0.0 { floor } else { f64::NAN };

        let y_top = wage * zhi * skill.highest();
        let xhi = rate * xhi_multiple * y_top + y_top + prices.transfers;

        Self { xlo, xhi }
    }

    pub fn is_finite(&self) -> bool {
        self.xlo.is_finite() && self.xhi.is_finite()
    }
}

fn positive_or_nan(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { f64::NAN }
}

/// Gauss–Legendre grid on `[xlo, xhi]` with weights normalized to one.
#[derive(Debug, Clone, PartialEq)]
pub struct CashGrid {
    bounds: CashBounds,
    nodes: Vec<f64>,
    weights: Vec<f64>,
    scale: f64,
}

impl CashGrid {
    /// Fails with `ErrorKind::Infeasible` for non-finite or empty bounds.
    pub fn build(bounds: CashBounds, nx: usize) -> Result<Self, AppError> {
        if !bounds.is_finite() {
            return Err(AppError::infeasible(format!(
                "Cash-on-hand bounds are not finite: xlo={}, xhi={}.",
                bounds.xlo, bounds.xhi
            )));
        }
        if bounds.xlo >= bounds.xhi {
            return Err(AppError::infeasible(format!(
                "Cash-on-hand bounds are empty: xlo={} >= xhi={}.",
                bounds.xlo, bounds.xhi
            )));
        }
        if nx == 0 {
            return Err(AppError::config("Cash-on-hand grid needs nx > 0."));
        }

        let (z, w) = gauss_legendre(nx);
        let scale = (bounds.xhi - bounds.xlo) / 2.0;
        let nodes = z.iter().map(|zi| bounds.xlo + (zi + 1.0) * scale).collect();
        let weights = w.iter().map(|wi| wi / 2.0).collect();

        Ok(Self {
            bounds,
            nodes,
            weights,
            scale,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> CashBounds {
        self.bounds
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Probability weights (sum to one).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Half-width of `[xlo, xhi]`: `∫ f dx ≈ 2·scale·Σ wᵢ f(xᵢ)`.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
