//! Model parameters: named scalars with bounds, priors and transforms.
//!
//! Parameters are declared once through [`ParameterSetBuilder::add_parameter`]
//! and frozen into a [`ParameterSet`]. The set supports get/set by name with
//! bounds validation and seeded prior draws for batch evaluation.

pub mod prior;

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use prior::*;

/// One model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: f64,
    /// Inclusive bounds on admissible values.
    pub bounds: (f64, f64),
    pub prior: Option<Prior>,
    pub transform: Transform,
    /// Fixed parameters are never redrawn.
    pub fixed: bool,
    pub description: String,
}

impl Parameter {
    /// A free parameter with a prior.
    pub fn free(
        key: &str,
        value: f64,
        bounds: (f64, f64),
        prior: Prior,
        transform: Transform,
        description: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            value,
            bounds,
            prior: Some(prior),
            transform,
            fixed: false,
            description: description.to_string(),
        }
    }

    /// A calibrated parameter held at `value`.
    pub fn fixed(key: &str, value: f64, description: &str) -> Self {
        Self {
            key: key.to_string(),
            value,
            bounds: (value, value),
            prior: None,
            transform: Transform::Identity,
            fixed: true,
            description: description.to_string(),
        }
    }

    fn in_bounds(&self, value: f64) -> bool {
        value >= self.bounds.0 && value <= self.bounds.1
    }
}

/// Collects parameter declarations; single writer until [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ParameterSetBuilder {
    params: Vec<Parameter>,
}

impl ParameterSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter. Duplicate keys and out-of-bounds initial values are
    /// configuration errors.
    pub fn add_parameter(&mut self, param: Parameter) -> Result<&mut Self, AppError> {
        if self.params.iter().any(|p| p.key == param.key) {
            return Err(AppError::config(format!("Duplicate parameter '{}'.", param.key)));
        }
        let (lo, hi) = param.bounds;
        if !(lo <= hi) {
            return Err(AppError::config(format!(
                "Parameter '{}' has inverted bounds [{lo}, {hi}].",
                param.key
            )));
        }
        if !param.in_bounds(param.value) {
            return Err(AppError::config(format!(
                "Parameter '{}' initial value {} outside [{lo}, {hi}].",
                param.key, param.value
            )));
        }
        if !param.fixed && param.prior.is_none() {
            return Err(AppError::config(format!(
                "Free parameter '{}' needs a prior.",
                param.key
            )));
        }
        self.params.push(param);
        Ok(self)
    }

    pub fn build(self) -> ParameterSet {
        let index = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key.clone(), i))
            .collect();
        ParameterSet {
            params: self.params,
            index,
        }
    }
}

/// Frozen, name-addressable parameter collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl ParameterSet {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn get(&self, key: &str) -> Result<&Parameter, AppError> {
        self.index
            .get(key)
            .map(|&i| &self.params[i])
            .ok_or_else(|| AppError::lookup(format!("Unknown parameter '{key}'.")))
    }

    pub fn value(&self, key: &str) -> Result<f64, AppError> {
        self.get(key).map(|p| p.value)
    }

    /// Set a value, rejecting anything outside the parameter's bounds.
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), AppError> {
        let i = *self
            .index
            .get(key)
            .ok_or_else(|| AppError::lookup(format!("Unknown parameter '{key}'.")))?;
        let param = &mut self.params[i];
        if !param.in_bounds(value) {
            return Err(AppError::config(format!(
                "Value {value} for '{key}' outside [{}, {}].",
                param.bounds.0, param.bounds.1
            )));
        }
        param.value = value;
        Ok(())
    }

    /// Copy of this set with one value replaced.
    pub fn with_value(&self, key: &str, value: f64) -> Result<ParameterSet, AppError> {
        let mut out = self.clone();
        out.set(key, value)?;
        Ok(out)
    }

    /// Free parameters mapped to the real line, in declaration order.
    pub fn to_real(&self) -> Vec<f64> {
        self.params
            .iter()
            .filter(|p| !p.fixed)
            .map(|p| p.transform.to_real(p.value, p.bounds))
            .collect()
    }

    /// Redraw every free parameter from its prior.
    ///
    /// A draw landing outside a parameter's bounds is reported as
    /// `ErrorKind::Infeasible` so batch callers can count it as a rejection.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParameterSet, AppError> {
        let mut out = self.clone();
        for param in out.params.iter_mut().filter(|p| !p.fixed) {
            let Some(prior) = param.prior else {
                continue;
            };
            let value = prior.sample(rng)?;
            if !param.in_bounds(value) {
                return Err(AppError::infeasible(format!(
                    "Prior draw {value} for '{}' outside [{}, {}].",
                    param.key, param.bounds.0, param.bounds.1
                )));
            }
            param.value = value;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_set() -> ParameterSet {
        let mut b = ParameterSetBuilder::new();
        b.add_parameter(Parameter::free(
            "alpha",
            0.3,
            (0.0, 1.0),
            Prior::Beta { mean: 0.3, sd: 0.05 },
            Transform::Bounded,
            "capital elasticity",
        ))
        .unwrap()
        .add_parameter(Parameter::fixed("delta", 0.03, "depreciation"))
        .unwrap();
        b.build()
    }

    #[test]
    fn get_and_set_by_name() {
        let mut params = sample_set();
        assert_eq!(params.value("alpha").unwrap(), 0.3);
        params.set("alpha", 0.35).unwrap();
        assert_eq!(params.value("alpha").unwrap(), 0.35);
    }

    #[test]
    fn set_outside_bounds_is_rejected() {
        let mut params = sample_set();
        let err = params.set("alpha", 1.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(params.value("alpha").unwrap(), 0.3);
    }

    #[test]
    fn unknown_parameter_is_a_lookup_error() {
        let params = sample_set();
        assert_eq!(params.value("gamma").unwrap_err().kind(), ErrorKind::Lookup);
    }

    #[test]
    fn duplicate_declaration_is_rejected() {
        let mut b = ParameterSetBuilder::new();
        b.add_parameter(Parameter::fixed("delta", 0.03, "")).unwrap();
        let err = b.add_parameter(Parameter::fixed("delta", 0.05, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn draw_only_touches_free_parameters() {
        let params = sample_set();
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = params.draw(&mut rng).unwrap();
        assert_eq!(drawn.value("delta").unwrap(), 0.03);
        let alpha = drawn.value("alpha").unwrap();
        assert!(alpha > 0.0 && alpha < 1.0);
        assert_ne!(alpha, 0.3);
    }
}
