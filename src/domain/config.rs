//! Static model configuration.
//!
//! `ModelConfig` is the typed replacement for an open key/value settings store:
//! every setting is an enumerated field, unknown keys in a config file are
//! rejected by serde, and [`ModelConfig::validate`] checks cross-field
//! consistency before anything is constructed.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings consumed by the grid builder, the index registry and the
/// degrees-of-freedom normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Cash-on-hand grid points.
    pub nx: usize,
    /// Skill grid points.
    pub ns: usize,
    /// Tauchen spread: skill nodes span `±λ` unconditional standard deviations
    /// (only used for `ns > 2`).
    pub tauchen_lambda: f64,
    /// Width of the cash-on-hand grid above `xlo`, in multiples of the highest
    /// labor income draw.
    pub xhi_multiple: f64,

    /// Degrees of freedom removed from each distributional backward-looking block.
    pub dof_removed_state: usize,
    /// Degrees of freedom removed from each distributional jump block.
    pub dof_removed_jump: usize,

    pub n_function_valued_backward_looking: usize,
    pub n_function_valued_jumps: usize,
    pub n_distributional_backward_looking: usize,
    pub n_distributional_jumps: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            nx: 300,
            ns: 2,
            tauchen_lambda: 3.0,
            xhi_multiple: 10.0,
            dof_removed_state: 2,
            dof_removed_jump: 0,
            n_function_valued_backward_looking: 1,
            n_function_valued_jumps: 1,
            n_distributional_backward_looking: 1,
            n_distributional_jumps: 1,
        }
    }
}

impl ModelConfig {
    /// Total grid size `n = nx · ns`.
    pub fn grid_size(&self) -> usize {
        self.nx * self.ns
    }

    /// Adding-up constraints available on one distributional block: the
    /// overall integral plus one marginal per additional skill state.
    pub fn available_dof(&self) -> usize {
        self.ns
    }

    /// Parse a JSON config, rejecting unknown keys, and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let config: ModelConfig = serde_json::from_str(text)
            .map_err(|e| AppError::config(format!("Invalid model config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting and the relations between them.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nx < 2 {
            return Err(AppError::config(format!("nx must be >= 2 (got {}).", self.nx)));
        }
        if self.ns < 2 {
            return Err(AppError::config(format!("ns must be >= 2 (got {}).", self.ns)));
        }
        if !(self.tauchen_lambda.is_finite() && self.tauchen_lambda > 0.0) {
            return Err(AppError::config(format!(
                "tauchen_lambda must be finite and > 0 (got {}).",
                self.tauchen_lambda
            )));
        }
        if !(self.xhi_multiple.is_finite() && self.xhi_multiple > 0.0) {
            return Err(AppError::config(format!(
                "xhi_multiple must be finite and > 0 (got {}).",
                self.xhi_multiple
            )));
        }

        if self.n_function_valued_backward_looking != 1 || self.n_function_valued_jumps != 1 {
            return Err(AppError::config(
                "Exactly one function-valued backward-looking variable and one function-valued jump are supported.",
            ));
        }
        if self.n_distributional_backward_looking > self.n_function_valued_backward_looking
            || self.n_distributional_jumps > self.n_function_valued_jumps
        {
            return Err(AppError::config(
                "Distributional variable counts cannot exceed function-valued counts.",
            ));
        }
        // Removing dofs from several endogenous distributions at once is not defined.
        if self.n_distributional_backward_looking != 1 || self.n_distributional_jumps != 1 {
            return Err(AppError::config(
                "Only one distributional backward-looking variable and one distributional jump are supported.",
            ));
        }

        let available = self.available_dof();
        let n = self.grid_size();
        for (label, dof) in [
            ("dof_removed_state", self.dof_removed_state),
            ("dof_removed_jump", self.dof_removed_jump),
        ] {
            if dof > available {
                return Err(AppError::config(format!(
                    "{label}={dof} exceeds the available distributional dimension ({available})."
                )));
            }
            if dof >= n {
                return Err(AppError::config(format!(
                    "{label}={dof} leaves no free grid points (n={n})."
                )));
            }
        }

        Ok(())
    }
}
