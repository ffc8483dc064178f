//! Shared domain types.
//!
//! These types describe *where* model quantities live inside the flat numeric
//! vectors handed to equation-construction code and the linear solver:
//!
//! - variable names (`Symbol`)
//! - contiguous index ranges (`IndexRange`)
//! - block classification (`Role`, `BlockKind`)
//! - the five addressing namespaces (`Namespace`)

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of one economic quantity (state, jump, shock, equation, observable).
///
/// Symbols are compared by their text. Uniqueness is enforced per namespace when
/// a registry is frozen, never afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A contiguous block of positions in a flat vector.
///
/// Ranges are 0-based and half-open (`start..end`). Reports and the
/// equation-construction conventions use 1-based inclusive bounds; see
/// [`IndexRange::first_one_based`] and [`IndexRange::last_one_based`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx < self.end
    }

    pub fn first_one_based(&self) -> usize {
        self.start + 1
    }

    pub fn last_one_based(&self) -> usize {
        self.end
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first_one_based(), self.last_one_based())
    }
}

/// Causal role of an endogenous state.
///
/// Backward-looking variables are predetermined; jumps are pinned down by
/// expectations; shock processes are the exogenous AR states that drive the
/// model and sit outside the reduced (normalized) block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    BackwardLooking,
    Jump,
    ShockProcess,
}

/// Block classification. The declaration order of the variants *is* the
/// canonical block order of the endogenous and equation namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Grid-length, real-time function (density, policy/value function).
    Function,
    /// Scalar aggregated from a function block.
    Aggregate,
    /// Other contemporaneous scalar.
    Structural,
    /// Lagged copy of a scalar.
    Lagged,
    /// Exogenous AR shock state.
    ShockProcess,
}

impl BlockKind {
    pub fn is_function(self) -> bool {
        matches!(self, BlockKind::Function)
    }
}

/// The five addressing namespaces of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    EndogenousStates,
    ExogenousShocks,
    ExpectedShocks,
    EquilibriumConditions,
    Observables,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::EndogenousStates,
        Namespace::ExogenousShocks,
        Namespace::ExpectedShocks,
        Namespace::EquilibriumConditions,
        Namespace::Observables,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Namespace::EndogenousStates => "endogenous states",
            Namespace::ExogenousShocks => "exogenous shocks",
            Namespace::ExpectedShocks => "expected shocks",
            Namespace::EquilibriumConditions => "equilibrium conditions",
            Namespace::Observables => "observables",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_view_of_half_open_range() {
        let r = IndexRange::new(1227, 1);
        assert_eq!(r.first_one_based(), 1228);
        assert_eq!(r.last_one_based(), 1228);
        assert_eq!(r.to_string(), "[1228, 1228]");
        assert!(r.contains(1227));
        assert!(!r.contains(1228));
    }

    #[test]
    fn block_kind_order_is_canonical() {
        let mut kinds = vec![
            BlockKind::ShockProcess,
            BlockKind::Lagged,
            BlockKind::Function,
            BlockKind::Structural,
            BlockKind::Aggregate,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Function,
                BlockKind::Aggregate,
                BlockKind::Structural,
                BlockKind::Lagged,
                BlockKind::ShockProcess,
            ]
        );
    }
}
