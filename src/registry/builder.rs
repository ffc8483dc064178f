//! Two-phase registry construction.
//!
//! [`RegistryBuilder`] only records declarations. [`RegistryBuilder::build`]
//! validates them and lays every namespace out in one pass:
//!
//! 1. endogenous states are stably sorted by `(BlockKind, Role)`, so function
//!    blocks come first, then aggregates, structural scalars, lags and shock
//!    processes; within a kind, backward-looking states precede jumps and
//!    declaration order is kept
//! 2. each state's equation gets the same position and length as the state
//! 3. shocks, expected shocks and observables are laid out in declaration order

use tracing::debug;

use crate::domain::{BlockKind, Namespace, Role, Symbol};
use crate::error::AppError;
use crate::registry::layout::{EndogenousEntry, IndexRegistry, Layout};

#[derive(Debug, Clone)]
struct Declaration {
    symbol: Symbol,
    role: Role,
    kind: BlockKind,
    equation: Symbol,
}

/// Collects symbol declarations for an [`IndexRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    grid_size: usize,
    endogenous: Vec<Declaration>,
    exogenous_shocks: Vec<Symbol>,
    expected_shocks: Vec<Symbol>,
    observables: Vec<Symbol>,
}

impl RegistryBuilder {
    /// `grid_size` is the total grid length `n = nx · ns` of function blocks.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            endogenous: Vec::new(),
            exogenous_shocks: Vec::new(),
            expected_shocks: Vec::new(),
            observables: Vec::new(),
        }
    }

    /// Declare a predetermined state and the equation that determines it.
    pub fn backward_looking(&mut self, symbol: &str, kind: BlockKind, equation: &str) -> &mut Self {
        self.endogenous(symbol, Role::BackwardLooking, kind, equation)
    }

    /// Declare a forward-looking state and the equation that determines it.
    pub fn jump(&mut self, symbol: &str, kind: BlockKind, equation: &str) -> &mut Self {
        self.endogenous(symbol, Role::Jump, kind, equation)
    }

    /// Declare an exogenous AR shock state and its law of motion.
    pub fn shock_process(&mut self, symbol: &str, equation: &str) -> &mut Self {
        self.endogenous(symbol, Role::ShockProcess, BlockKind::ShockProcess, equation)
    }

    pub fn exogenous_shock(&mut self, symbol: &str) -> &mut Self {
        self.exogenous_shocks.push(Symbol::from(symbol));
        self
    }

    pub fn expected_shock(&mut self, symbol: &str) -> &mut Self {
        self.expected_shocks.push(Symbol::from(symbol));
        self
    }

    pub fn observable(&mut self, symbol: &str) -> &mut Self {
        self.observables.push(Symbol::from(symbol));
        self
    }

    fn endogenous(&mut self, symbol: &str, role: Role, kind: BlockKind, equation: &str) -> &mut Self {
        self.endogenous.push(Declaration {
            symbol: Symbol::from(symbol),
            role,
            kind,
            equation: Symbol::from(equation),
        });
        self
    }

    /// Validate the declarations and freeze them into an [`IndexRegistry`].
    pub fn build(&self) -> Result<IndexRegistry, AppError> {
        if self.grid_size == 0 {
            return Err(AppError::config("Grid size must be > 0."));
        }
        self.validate_roles()?;

        let mut decls = self.endogenous.clone();
        decls.sort_by_key(|d| (d.kind, d.role));

        let n = self.grid_size;
        let size_of = |d: &Declaration| if d.kind.is_function() { n } else { 1 };

        let endogenous = Layout::from_sizes(
            Namespace::EndogenousStates,
            0,
            decls.iter().map(|d| (d.symbol.clone(), size_of(d))),
        )?;
        let equilibrium_conditions = Layout::from_sizes(
            Namespace::EquilibriumConditions,
            0,
            decls.iter().map(|d| (d.equation.clone(), size_of(d))),
        )?;
        let scalars = |symbols: &[Symbol]| symbols.iter().cloned().map(|s| (s, 1)).collect::<Vec<_>>();
        let exogenous_shocks =
            Layout::from_sizes(Namespace::ExogenousShocks, 0, scalars(&self.exogenous_shocks))?;
        let expected_shocks =
            Layout::from_sizes(Namespace::ExpectedShocks, 0, scalars(&self.expected_shocks))?;
        let observables = Layout::from_sizes(Namespace::Observables, 0, scalars(&self.observables))?;

        let entries = decls
            .into_iter()
            .zip(endogenous.iter().map(|(_, r)| r))
            .map(|(d, range)| EndogenousEntry {
                symbol: d.symbol,
                role: d.role,
                kind: d.kind,
                equation: d.equation,
                range,
            })
            .collect();

        let registry = IndexRegistry {
            grid_size: n,
            entries,
            endogenous,
            equilibrium_conditions,
            exogenous_shocks,
            expected_shocks,
            observables,
        };
        registry.validate_dimension()?;

        debug!(
            grid_size = n,
            endogenous = registry.endogenous_dim(),
            scalars = registry.scalar_count(),
            "froze index registry"
        );
        Ok(registry)
    }

    fn validate_roles(&self) -> Result<(), AppError> {
        for d in &self.endogenous {
            let shock_role = d.role == Role::ShockProcess;
            let shock_kind = d.kind == BlockKind::ShockProcess;
            if shock_role != shock_kind {
                return Err(AppError::config(format!(
                    "'{}' mixes role {:?} with block kind {:?}.",
                    d.symbol, d.role, d.kind
                )));
            }
        }

        for role in [Role::BackwardLooking, Role::Jump] {
            let functions: Vec<&Symbol> = self
                .endogenous
                .iter()
                .filter(|d| d.role == role && d.kind.is_function())
                .map(|d| &d.symbol)
                .collect();
            if functions.len() != 1 {
                return Err(AppError::config(format!(
                    "Expected exactly one function-valued {role:?} state, found {}.",
                    functions.len()
                )));
            }
        }
        Ok(())
    }
}
