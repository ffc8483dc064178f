//! Frozen index layouts.
//!
//! A [`Layout`] is one namespace's assignment of symbols to contiguous ranges;
//! by construction the ranges partition `0..dim()` in insertion order. An
//! [`IndexRegistry`] bundles the five namespaces of a model together with the
//! role/kind metadata of every endogenous state.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{BlockKind, IndexRange, Namespace, Role, Symbol};
use crate::error::AppError;

/// Symbols of one namespace laid out back to back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    entries: Vec<(Symbol, IndexRange)>,
    #[serde(skip)]
    index: HashMap<Symbol, usize>,
}

impl Layout {
    /// Lay out `(symbol, length)` pairs starting at `offset`.
    ///
    /// Duplicate symbols are a configuration error.
    pub fn from_sizes(
        namespace: Namespace,
        offset: usize,
        sizes: impl IntoIterator<Item = (Symbol, usize)>,
    ) -> Result<Self, AppError> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut next = offset;
        for (symbol, len) in sizes {
            if index.contains_key(&symbol) {
                return Err(AppError::config(format!(
                    "Duplicate symbol '{symbol}' in {}.",
                    namespace.display_name()
                )));
            }
            index.insert(symbol.clone(), entries.len());
            entries.push((symbol, IndexRange::new(next, len)));
            next += len;
        }
        Ok(Self { entries, index })
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<IndexRange> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, IndexRange)> {
        self.entries.iter().map(|(s, r)| (s, *r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One past the last assigned index.
    pub fn end(&self) -> usize {
        self.entries.last().map(|(_, r)| r.end).unwrap_or(0)
    }

    /// Total number of positions covered (independent of the starting offset).
    pub fn dim(&self) -> usize {
        self.entries.iter().map(|(_, r)| r.len()).sum()
    }
}

/// Metadata for one endogenous state and the equation that determines it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndogenousEntry {
    pub symbol: Symbol,
    pub role: Role,
    pub kind: BlockKind,
    pub equation: Symbol,
    pub range: IndexRange,
}

/// The unnormalized, frozen registry of a model.
///
/// Produced by [`RegistryBuilder::build`](super::RegistryBuilder::build); never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRegistry {
    pub(crate) grid_size: usize,
    pub(crate) entries: Vec<EndogenousEntry>,
    pub(crate) endogenous: Layout,
    pub(crate) equilibrium_conditions: Layout,
    pub(crate) exogenous_shocks: Layout,
    pub(crate) expected_shocks: Layout,
    pub(crate) observables: Layout,
}

impl IndexRegistry {
    /// Endogenous dimension for one function-valued state, one function-valued
    /// jump and `n_scalars` scalar states: `2·n + S`.
    pub fn endogenous_dimension(grid_size: usize, n_scalars: usize) -> usize {
        2 * grid_size + n_scalars
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Endogenous states in canonical order.
    pub fn entries(&self) -> &[EndogenousEntry] {
        &self.entries
    }

    pub fn layout(&self, namespace: Namespace) -> &Layout {
        match namespace {
            Namespace::EndogenousStates => &self.endogenous,
            Namespace::ExogenousShocks => &self.exogenous_shocks,
            Namespace::ExpectedShocks => &self.expected_shocks,
            Namespace::EquilibriumConditions => &self.equilibrium_conditions,
            Namespace::Observables => &self.observables,
        }
    }

    /// Range of `name` in `namespace`. Unknown names are a lookup error.
    pub fn range(&self, namespace: Namespace, name: &str) -> Result<IndexRange, AppError> {
        self.layout(namespace).get(name).ok_or_else(|| {
            AppError::lookup(format!(
                "No symbol '{name}' among {}.",
                namespace.display_name()
            ))
        })
    }

    pub fn entry(&self, name: &str) -> Result<&EndogenousEntry, AppError> {
        self.entries
            .iter()
            .find(|e| e.symbol.as_str() == name)
            .ok_or_else(|| AppError::lookup(format!("No endogenous state '{name}'.")))
    }

    pub fn endogenous_dim(&self) -> usize {
        self.endogenous.dim()
    }

    /// Number of scalar endogenous states (including lags and shock processes).
    pub fn scalar_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.kind.is_function()).count()
    }

    pub fn function_count(&self, role: Role) -> usize {
        self.entries
            .iter()
            .filter(|e| e.role == role && e.kind.is_function())
            .count()
    }

    pub fn scalar_count_for(&self, role: Role) -> usize {
        self.entries
            .iter()
            .filter(|e| e.role == role && !e.kind.is_function())
            .count()
    }

    /// Unnormalized dimension of all states with `role`.
    pub fn role_dim(&self, role: Role) -> usize {
        self.entries
            .iter()
            .filter(|e| e.role == role)
            .map(|e| e.range.len())
            .sum()
    }

    /// Unnormalized dimension of the backward-looking + jump block.
    pub fn model_dim(&self) -> usize {
        self.role_dim(Role::BackwardLooking) + self.role_dim(Role::Jump)
    }

    /// Check `N = 2·n + S` against the laid-out ranges.
    pub fn validate_dimension(&self) -> Result<(), AppError> {
        let expected = Self::endogenous_dimension(self.grid_size, self.scalar_count());
        let actual = self.endogenous_dim();
        if expected != actual {
            return Err(AppError::config(format!(
                "Endogenous dimension {actual} != 2·{} + {} = {expected}.",
                self.grid_size,
                self.scalar_count()
            )));
        }
        if self.equilibrium_conditions.dim() != actual {
            return Err(AppError::config(format!(
                "Equilibrium conditions cover {} rows but there are {actual} states.",
                self.equilibrium_conditions.dim()
            )));
        }
        Ok(())
    }
}
