//! Degrees-of-freedom normalization.
//!
//! Produces the reduced registry together with the matrices that map the
//! unnormalized backward-looking and jump blocks onto their reduced
//! coordinates:
//!
//! - `qx`: reduced states × backward-looking coordinates (gathered in
//!   registry order)
//! - `qy`: reduced jumps × jump coordinates
//! - `qleft`: `[qx; qy]` scattered into registry positions, so it multiplies
//!   the first `model_dim` entries of an endogenous vector directly
//! - `qright = qleftᵀ`
//!
//! Shock-process states are never reduced and are not covered by `qleft`.

pub mod constraints;

use nalgebra::DMatrix;
use tracing::{debug, info};

use crate::domain::{ModelConfig, Role};
use crate::error::AppError;
use crate::grid::TotalGrid;
use crate::registry::{IndexRegistry, NormalizedRegistry};

pub use constraints::*;

/// How many degrees of freedom each function block loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DofSettings {
    pub dof_removed_state: usize,
    pub dof_removed_jump: usize,
}

impl DofSettings {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            dof_removed_state: config.dof_removed_state,
            dof_removed_jump: config.dof_removed_jump,
        }
    }

    pub fn for_role(&self, role: Role) -> usize {
        match role {
            Role::BackwardLooking => self.dof_removed_state,
            Role::Jump => self.dof_removed_jump,
            Role::ShockProcess => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationMatrices {
    pub qx: DMatrix<f64>,
    pub qy: DMatrix<f64>,
    pub qleft: DMatrix<f64>,
    pub qright: DMatrix<f64>,
}

impl NormalizationMatrices {
    /// Rows of `qx`: the number of predetermined variables after reduction.
    pub fn n_predetermined(&self) -> usize {
        self.qx.nrows()
    }

    pub fn n_model_states(&self) -> usize {
        self.qleft.nrows()
    }
}

/// Reduces a registry's function blocks on a given total grid.
#[derive(Debug, Clone, Copy)]
pub struct DofNormalizer<'a> {
    grid: &'a TotalGrid,
    settings: DofSettings,
}

impl<'a> DofNormalizer<'a> {
    pub fn new(grid: &'a TotalGrid, settings: DofSettings) -> Self {
        Self { grid, settings }
    }

    pub fn normalize(
        &self,
        registry: IndexRegistry,
    ) -> Result<(NormalizedRegistry, NormalizationMatrices), AppError> {
        let n = registry.grid_size();
        if self.grid.len() != n {
            return Err(AppError::config(format!(
                "Registry grid size {n} does not match the total grid ({} points).",
                self.grid.len()
            )));
        }
        let available = self.grid.ns();
        for role in [Role::BackwardLooking, Role::Jump] {
            let dof = self.settings.for_role(role);
            if dof > available || dof >= n {
                return Err(AppError::config(format!(
                    "Cannot remove {dof} degrees of freedom from {role:?} blocks: \
                     at most {available} are available on a grid of {n} points."
                )));
            }
        }

        let (qx, qy) = rayon::join(
            || self.role_matrix(&registry, Role::BackwardLooking),
            || self.role_matrix(&registry, Role::Jump),
        );
        let (qx, qy) = (qx?, qy?);

        let qleft = scatter(&registry, &qx, &qy)?;
        let qright = qleft.transpose();

        let normalized = NormalizedRegistry::new(
            registry,
            self.settings.dof_removed_state,
            self.settings.dof_removed_jump,
        )?;

        info!(
            qx = ?qx.shape(),
            qy = ?qy.shape(),
            n_model_states = qleft.nrows(),
            "normalized degrees of freedom"
        );

        Ok((
            normalized,
            NormalizationMatrices {
                qx,
                qy,
                qleft,
                qright,
            },
        ))
    }

    /// Block-diagonal reduction for all states of `role`: one reduction block
    /// per function, an identity entry per scalar.
    fn role_matrix(&self, registry: &IndexRegistry, role: Role) -> Result<DMatrix<f64>, AppError> {
        let dof = self.settings.for_role(role);
        let n = registry.grid_size();
        let functions = registry.function_count(role);
        let scalars = registry.scalar_count_for(role);

        let cols = registry.role_dim(role);
        let rows = cols - functions * dof;
        let expected = n * functions + scalars - dof * functions;
        if rows != expected {
            return Err(AppError::config(format!(
                "{role:?} block has {rows} reduced rows, expected {expected}."
            )));
        }

        let block = if functions > 0 {
            Some(reduction_block(self.grid, dof)?)
        } else {
            None
        };

        let mut q = DMatrix::<f64>::zeros(rows, cols);
        let (mut r, mut c) = (0, 0);
        for entry in registry.entries().iter().filter(|e| e.role == role) {
            match (&block, entry.kind.is_function()) {
                (Some(b), true) => {
                    q.view_mut((r, c), b.shape()).copy_from(b);
                    r += b.nrows();
                }
                _ => {
                    q[(r, c)] = 1.0;
                    r += 1;
                }
            }
            c += entry.range.len();
        }

        debug!(?role, rows, cols, dof, "assembled reduction matrix");
        Ok(q)
    }
}

/// Stack `qx` over `qy` and move each column to its registry position.
fn scatter(
    registry: &IndexRegistry,
    qx: &DMatrix<f64>,
    qy: &DMatrix<f64>,
) -> Result<DMatrix<f64>, AppError> {
    let model_dim = registry.model_dim();
    let mut qleft = DMatrix::<f64>::zeros(qx.nrows() + qy.nrows(), model_dim);

    for (role, q, row_base) in [
        (Role::BackwardLooking, qx, 0),
        (Role::Jump, qy, qx.nrows()),
    ] {
        let positions: Vec<usize> = registry
            .entries()
            .iter()
            .filter(|e| e.role == role)
            .flat_map(|e| e.range.as_range())
            .collect();
        for (c, &pos) in positions.iter().enumerate() {
            if pos >= model_dim {
                return Err(AppError::config(format!(
                    "{role:?} coordinate at position {pos} lies beyond the model block ({model_dim})."
                )));
            }
            qleft
                .view_mut((row_base, pos), (q.nrows(), 1))
                .copy_from(&q.column(c));
        }
    }
    Ok(qleft)
}

/// Normalize `registry` on `grid` with the dof counts from `config`.
pub fn normalize(
    registry: IndexRegistry,
    grid: &TotalGrid,
    config: &ModelConfig,
) -> Result<(NormalizedRegistry, NormalizationMatrices), AppError> {
    DofNormalizer::new(grid, DofSettings::from_config(config)).normalize(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockKind, Namespace};
    use crate::error::ErrorKind;
    use crate::grid::{CashBounds, CashGrid, SkillGrid, SkillProcess};
    use crate::registry::RegistryBuilder;

    fn grid(nx: usize, ns: usize) -> TotalGrid {
        let process = SkillProcess {
            skill_ratio: 3.0,
            p_lh: 0.05,
            p_hl: 0.1,
        };
        let skill = SkillGrid::build(&process, ns, 3.0).unwrap();
        let cash = CashGrid::build(CashBounds { xlo: 0.3, xhi: 20.0 }, nx).unwrap();
        TotalGrid::new(&cash, &skill)
    }

    fn registry(n: usize) -> IndexRegistry {
        let mut b = RegistryBuilder::new(n);
        b.backward_looking("g_t", BlockKind::Function, "eq_kfe")
            .backward_looking("k_t", BlockKind::Structural, "eq_k")
            .backward_looking("c_t1", BlockKind::Lagged, "eq_c_lag")
            .jump("v_t", BlockKind::Function, "eq_bellman")
            .jump("c_t", BlockKind::Structural, "eq_c")
            .shock_process("z_t", "eq_z");
        b.build().unwrap()
    }

    fn settings(state: usize, jump: usize) -> DofSettings {
        DofSettings {
            dof_removed_state: state,
            dof_removed_jump: jump,
        }
    }

    #[test]
    fn matrix_shapes_follow_removed_dof() {
        let g = grid(6, 2);
        let (reg, q) = DofNormalizer::new(&g, settings(2, 1))
            .normalize(registry(12))
            .unwrap();
        assert_eq!(q.qx.shape(), (12 + 2 - 2, 14));
        assert_eq!(q.qy.shape(), (12 + 1 - 1, 13));
        assert_eq!(q.qleft.shape(), (12 + 12, 27));
        assert_eq!(q.qright, q.qleft.transpose());
        assert_eq!(q.n_predetermined(), 12);
        assert_eq!(reg.endogenous_dim(), 28 - 3);
    }

    #[test]
    fn qleft_has_orthonormal_rows_and_kills_the_density_mass() {
        let g = grid(6, 2);
        let reg = registry(12);
        let (_, q) = DofNormalizer::new(&g, settings(2, 0)).normalize(reg.clone()).unwrap();

        let gram = &q.qleft * &q.qright;
        let eye = DMatrix::<f64>::identity(q.qleft.nrows(), q.qleft.nrows());
        assert!((gram - eye).amax() < 1e-12);

        // A pure density-mass perturbation lies in the removed directions.
        let mut v = nalgebra::DVector::<f64>::zeros(reg.model_dim());
        let density = reg.range(Namespace::EndogenousStates, "g_t").unwrap();
        v.rows_mut(density.start, density.len()).copy_from(g.weights());
        assert!((&q.qleft * v).amax() < 1e-12);
    }

    #[test]
    fn scalar_states_pass_through_at_their_registry_position() {
        let g = grid(6, 2);
        let reg = registry(12);
        let (_, q) = DofNormalizer::new(&g, settings(1, 0)).normalize(reg.clone()).unwrap();
        let k = reg.range(Namespace::EndogenousStates, "k_t").unwrap().start;
        // g_t keeps 11 rows, then k_t.
        assert_eq!(q.qleft[(11, k)], 1.0);
        assert_eq!(q.qleft.column(k).sum(), 1.0);
    }

    #[test]
    fn normalization_is_deterministic() {
        let g = grid(20, 3);
        let normalizer = DofNormalizer::new(&g, settings(3, 1));
        let (_, a) = normalizer.normalize(registry(60)).unwrap();
        let (_, b) = normalizer.normalize(registry(60)).unwrap();
        assert!(a.qleft.iter().zip(b.qleft.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    fn too_many_removed_dof_is_a_configuration_error() {
        let g = grid(6, 2);
        let err = DofNormalizer::new(&g, settings(3, 0))
            .normalize(registry(12))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn grid_must_match_registry() {
        let g = grid(6, 2);
        let err = DofNormalizer::new(&g, settings(1, 0))
            .normalize(registry(10))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
