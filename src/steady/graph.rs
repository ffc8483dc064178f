//! Steady state as a fixed dependency graph of pure definitions.
//!
//! Each [`Definition`] names the values it depends on and receives exactly
//! those values (in declared order) when evaluated, so it cannot read a value
//! that has not been computed yet. [`SteadyStateGraph::new`] checks once that
//! keys are unique and that every dependency is defined earlier in the list;
//! evaluation is then a single forward pass.
//!
//! Non-finite results are not errors: they propagate as ordinary values and the
//! caller decides whether to reject the parameter draw.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::steady::definitions::{SsKey, SteadyStateInputs};

/// Pure function of the inputs and of the declared dependency values.
pub type EvalFn = fn(&SteadyStateInputs, &[f64]) -> f64;

#[derive(Clone, Copy)]
pub struct Definition {
    pub key: SsKey,
    pub deps: &'static [SsKey],
    pub eval: EvalFn,
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("key", &self.key)
            .field("deps", &self.deps)
            .finish()
    }
}

/// Validated, topologically ordered definitions.
#[derive(Debug, Clone)]
pub struct SteadyStateGraph {
    defs: Vec<Definition>,
    /// For each definition, positions of its dependencies in `defs`.
    dep_slots: Vec<Vec<usize>>,
}

impl SteadyStateGraph {
    pub fn new(defs: Vec<Definition>) -> Result<Self, AppError> {
        let mut position: HashMap<SsKey, usize> = HashMap::new();
        let mut dep_slots = Vec::with_capacity(defs.len());

        for (i, def) in defs.iter().enumerate() {
            let mut slots = Vec::with_capacity(def.deps.len());
            for dep in def.deps {
                let slot = position.get(dep).copied().ok_or_else(|| {
                    AppError::config(format!(
                        "Steady-state value '{}' depends on '{}', which is not defined before it.",
                        def.key.name(),
                        dep.name()
                    ))
                })?;
                slots.push(slot);
            }
            if position.insert(def.key, i).is_some() {
                return Err(AppError::config(format!(
                    "Steady-state value '{}' is defined twice.",
                    def.key.name()
                )));
            }
            dep_slots.push(slots);
        }

        Ok(Self { defs, dep_slots })
    }

    pub fn keys(&self) -> impl Iterator<Item = SsKey> + '_ {
        self.defs.iter().map(|d| d.key)
    }

    /// Evaluate every definition once, in order.
    pub fn evaluate(&self, inputs: &SteadyStateInputs) -> SteadyState {
        let mut values: Vec<(SsKey, f64)> = Vec::with_capacity(self.defs.len());
        let mut args = Vec::new();

        for (def, slots) in self.defs.iter().zip(&self.dep_slots) {
            args.clear();
            args.extend(slots.iter().map(|&s| values[s].1));
            values.push((def.key, (def.eval)(inputs, &args)));
        }

        let steady = SteadyState { values };
        debug!(
            values = steady.values.len(),
            finite = steady.is_finite(),
            "evaluated steady state"
        );
        steady
    }
}

/// Computed steady-state values, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SteadyState {
    values: Vec<(SsKey, f64)>,
}

impl SteadyState {
    pub fn get(&self, key: SsKey) -> Result<f64, AppError> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| AppError::lookup(format!("No steady-state value '{}'.", key.name())))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SsKey, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|(_, v)| v.is_finite())
    }

    /// Keys whose value is NaN or infinite.
    pub fn non_finite(&self) -> Vec<SsKey> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(k, _)| *k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

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

    fn real_rate(i: &SteadyStateInputs, _: &[f64]) -> f64 {
        i.r_star
    }

    fn rental(i: &SteadyStateInputs, d: &[f64]) -> f64 {
        d[0] + i.delta - 1.0
    }

    #[test]
    fn dependency_values_arrive_in_declared_order() {
        let graph = SteadyStateGraph::new(vec![
            Definition {
                key: SsKey::RealRate,
                deps: &[],
                eval: real_rate,
            },
            Definition {
                key: SsKey::RentalRate,
                deps: &[SsKey::RealRate],
                eval: rental,
            },
        ])
        .unwrap();
        let ss = graph.evaluate(&inputs());
        assert!((ss.get(SsKey::RentalRate).unwrap() - 0.04).abs() < 1e-14);
        assert_eq!(ss.get(SsKey::Output).unwrap_err().kind(), ErrorKind::Lookup);
    }

    #[test]
    fn forward_reference_is_rejected() {
        let err = SteadyStateGraph::new(vec![
            Definition {
                key: SsKey::RentalRate,
                deps: &[SsKey::RealRate],
                eval: rental,
            },
            Definition {
                key: SsKey::RealRate,
                deps: &[],
                eval: real_rate,
            },
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn self_reference_and_duplicates_are_rejected() {
        let cyclic = vec![Definition {
            key: SsKey::RealRate,
            deps: &[SsKey::RealRate],
            eval: real_rate,
        }];
        assert!(SteadyStateGraph::new(cyclic).is_err());

        let twice = vec![
            Definition {
                key: SsKey::RealRate,
                deps: &[],
                eval: real_rate,
            },
            Definition {
                key: SsKey::RealRate,
                deps: &[],
                eval: real_rate,
            },
        ];
        assert!(SteadyStateGraph::new(twice).is_err());
    }
}
