//! Adding-up constraints on a function block and the reduced basis they imply.
//!
//! A grid-length perturbation `δf` of a density (or of a function integrated
//! against it) is only identified up to the directions the model pins down
//! exactly. With `d` removed degrees of freedom we impose
//!
//! - `c₀ = ω` (total mass is fixed)
//! - `cⱼ = ω · 1{skill = j − 1}` for `j = 1..d−1` (skill-marginal masses are fixed)
//!
//! where `ω` are the total-grid quadrature weights. The skill marginals sum to
//! `ω`, so at most `ns` of these are independent.

use nalgebra::DMatrix;

use crate::error::AppError;
use crate::grid::TotalGrid;
use crate::math::orthonormal_complement;

/// `n × d` matrix of constraint columns.
pub fn constraint_matrix(grid: &TotalGrid, dof: usize) -> DMatrix<f64> {
    let n = grid.len();
    let mut c = DMatrix::<f64>::zeros(n, dof);
    if dof == 0 {
        return c;
    }
    c.set_column(0, grid.weights());
    for j in 1..dof {
        c.set_column(j, &grid.skill_marginal_weights(j - 1));
    }
    c
}

/// `(n − d) × n` block with orthonormal rows, annihilating the constraints.
///
/// With `d = 0` this is the identity.
pub fn reduction_block(grid: &TotalGrid, dof: usize) -> Result<DMatrix<f64>, AppError> {
    let n = grid.len();
    if dof > grid.ns() || dof >= n {
        return Err(AppError::config(format!(
            "Cannot remove {dof} degrees of freedom from a block of {n} points with {} skill states.",
            grid.ns()
        )));
    }
    let basis = orthonormal_complement(&constraint_matrix(grid, dof)).ok_or_else(|| {
        AppError::config(format!(
            "Adding-up constraints for {dof} degrees of freedom are linearly dependent."
        ))
    })?;
    Ok(basis.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::grid::{CashBounds, CashGrid, SkillGrid, SkillProcess};

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

    #[test]
    fn block_rows_are_orthonormal_and_annihilate_constraints() {
        let g = grid(12, 3);
        let q = reduction_block(&g, 3).unwrap();
        assert_eq!(q.shape(), (33, 36));

        let gram = &q * q.transpose();
        assert!((gram - DMatrix::<f64>::identity(33, 33)).amax() < 1e-12);

        let residual = &q * constraint_matrix(&g, 3);
        assert!(residual.amax() < 1e-12);
    }

    #[test]
    fn zero_dof_is_identity() {
        let g = grid(5, 2);
        assert_eq!(reduction_block(&g, 0).unwrap(), DMatrix::<f64>::identity(10, 10));
    }

    #[test]
    fn more_dof_than_skill_states_is_rejected() {
        let err = reduction_block(&grid(5, 2), 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
