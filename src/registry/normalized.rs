//! Registry after degrees-of-freedom normalization.
//!
//! Function blocks lose `dof` positions each (state and jump blocks with their
//! own counts); every later range shifts down accordingly, in both the state and
//! the equation namespaces. Augmented (lag-only) states are appended after the
//! last *normalized* state, since lags of reduced states must reference reduced
//! indices.

use tracing::debug;

use crate::domain::{IndexRange, Namespace, Role, Symbol};
use crate::error::AppError;
use crate::registry::layout::{IndexRegistry, Layout};

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRegistry {
    base: IndexRegistry,
    dof_removed_state: usize,
    dof_removed_jump: usize,
    endogenous: Layout,
    equilibrium_conditions: Layout,
    augmented: Layout,
}

impl NormalizedRegistry {
    /// Rewrite the endogenous and equation ranges of `base`.
    ///
    /// The caller (the normalizer) has already checked that both dof counts are
    /// below the grid size.
    pub(crate) fn new(
        base: IndexRegistry,
        dof_removed_state: usize,
        dof_removed_jump: usize,
    ) -> Result<Self, AppError> {
        let n = base.grid_size();
        let reduced_len = |role: Role, len: usize, is_function: bool| match (is_function, role) {
            (true, Role::BackwardLooking) => n - dof_removed_state,
            (true, Role::Jump) => n - dof_removed_jump,
            _ => len,
        };

        let sizes: Vec<(Symbol, Symbol, usize)> = base
            .entries()
            .iter()
            .map(|e| {
                (
                    e.symbol.clone(),
                    e.equation.clone(),
                    reduced_len(e.role, e.range.len(), e.kind.is_function()),
                )
            })
            .collect();

        let endogenous = Layout::from_sizes(
            Namespace::EndogenousStates,
            0,
            sizes.iter().map(|(s, _, len)| (s.clone(), *len)),
        )?;
        let equilibrium_conditions = Layout::from_sizes(
            Namespace::EquilibriumConditions,
            0,
            sizes.iter().map(|(_, eq, len)| (eq.clone(), *len)),
        )?;

        debug!(
            unnormalized = base.endogenous_dim(),
            normalized = endogenous.dim(),
            "normalized registry ranges"
        );

        Ok(Self {
            base,
            dof_removed_state,
            dof_removed_jump,
            augmented: Layout::empty(),
            endogenous,
            equilibrium_conditions,
        })
    }

    /// Append lag-only states after the last normalized state (and after any
    /// previously augmented states).
    pub fn augment(self, symbols: &[&str]) -> Result<Self, AppError> {
        for s in symbols {
            if self.endogenous.contains(s) {
                return Err(AppError::config(format!(
                    "Augmented state '{s}' collides with an endogenous state."
                )));
            }
        }

        let offset = self.endogenous.end();
        let sizes = self
            .augmented
            .iter()
            .map(|(s, r)| (s.clone(), r.len()))
            .chain(symbols.iter().map(|s| (Symbol::from(*s), 1)))
            .collect::<Vec<_>>();
        let augmented = Layout::from_sizes(Namespace::EndogenousStates, offset, sizes)?;

        Ok(Self { augmented, ..self })
    }

    /// The unnormalized registry this layout was derived from.
    pub fn unnormalized(&self) -> &IndexRegistry {
        &self.base
    }

    pub fn dof_removed(&self, role: Role) -> usize {
        match role {
            Role::BackwardLooking => self.dof_removed_state,
            Role::Jump => self.dof_removed_jump,
            Role::ShockProcess => 0,
        }
    }

    pub fn layout(&self, namespace: Namespace) -> &Layout {
        match namespace {
            Namespace::EndogenousStates => &self.endogenous,
            Namespace::EquilibriumConditions => &self.equilibrium_conditions,
            other => self.base.layout(other),
        }
    }

    pub fn augmented(&self) -> &Layout {
        &self.augmented
    }

    /// Normalized range of `name`. Endogenous lookups also search augmented
    /// states. Unknown names are a lookup error.
    pub fn range(&self, namespace: Namespace, name: &str) -> Result<IndexRange, AppError> {
        let found = match namespace {
            Namespace::EndogenousStates => self
                .endogenous
                .get(name)
                .or_else(|| self.augmented.get(name)),
            other => self.layout(other).get(name),
        };
        found.ok_or_else(|| {
            AppError::lookup(format!(
                "No symbol '{name}' among normalized {}.",
                namespace.display_name()
            ))
        })
    }

    /// Normalized dimension of the dynamic states (without augmented states).
    pub fn endogenous_dim(&self) -> usize {
        self.endogenous.dim()
    }

    /// Normalized dynamic states plus augmented states.
    pub fn state_dim(&self) -> usize {
        self.endogenous.dim() + self.augmented.dim()
    }
}
