//! Dense linear algebra helpers.
//!
//! Two problems recur during model construction:
//!
//! - the stationary distribution of a small Markov chain, written as the
//!   overdetermined system `[Πᵀ − I; 1ᵀ] π = [0; 1]`
//! - an orthonormal basis for the complement of a few adding-up constraint
//!   vectors on a function block
//!
//! Implementation choices:
//! - The stationary system is tall, so we solve it by SVD least squares
//!   (`QR::solve` is only meant for square systems).
//! - The complement basis is read off the `Q` factor of a Householder QR of
//!   `[C | I]`: the leading columns of `Q` span `C`, the rest span its
//!   orthogonal complement. The factorization is deterministic, so repeated
//!   calls are bit-identical.

use nalgebra::{DMatrix, DVector};

/// Relative tolerance below which a constraint column is considered dependent.
const RANK_TOL: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Stationary distribution of a row-stochastic transition matrix.
///
/// The caller is responsible for checking that the chain is primitive, which
/// makes the solution unique. Round-off negatives are clipped and the result
/// is renormalized to sum to one.
pub fn stationary_distribution(transition: &DMatrix<f64>) -> Option<DVector<f64>> {
    let n = transition.nrows();
    if n == 0 || transition.ncols() != n {
        return None;
    }

    let mut a = DMatrix::<f64>::zeros(n + 1, n);
    for i in 0..n {
        for j in 0..n {
            let identity = if i == j { 1.0 } else { 0.0 };
            a[(i, j)] = transition[(j, i)] - identity;
        }
    }
    for j in 0..n {
        a[(n, j)] = 1.0;
    }
    let mut b = DVector::<f64>::zeros(n + 1);
    b[n] = 1.0;

    let mut pi = solve_least_squares(&a, &b)?;
    pi.iter_mut().for_each(|p| *p = p.max(0.0));
    let total = pi.sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    pi /= total;
    Some(pi)
}

/// Orthonormal basis (as columns) of the complement of `span(constraints)`.
///
/// `constraints` is `n × d`; the result is `n × (n − d)`. Returns `None` if the
/// constraint columns are linearly dependent or `d > n`.
pub fn orthonormal_complement(constraints: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let (n, d) = constraints.shape();
    if d > n {
        return None;
    }
    if d == 0 {
        return Some(DMatrix::identity(n, n));
    }

    let mut augmented = DMatrix::<f64>::zeros(n, d + n);
    augmented.view_mut((0, 0), (n, d)).copy_from(constraints);
    augmented.view_mut((0, d), (n, n)).fill_with_identity();

    let qr = augmented.qr();
    let r = qr.r();
    for k in 0..d {
        let scale = constraints.column(k).norm();
        if !(scale.is_finite() && r[(k, k)].abs() > RANK_TOL * scale) {
            return None;
        }
    }

    let q = qr.q();
    Some(q.columns(d, n - d).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn two_state_chain_has_closed_form_stationary_weights() {
        let (p_lh, p_hl) = (0.1, 0.3);
        let t = DMatrix::from_row_slice(2, 2, &[1.0 - p_lh, p_lh, p_hl, 1.0 - p_hl]);
        let pi = stationary_distribution(&t).unwrap();
        assert!((pi[0] - p_hl / (p_lh + p_hl)).abs() < 1e-12);
        assert!((pi[1] - p_lh / (p_lh + p_hl)).abs() < 1e-12);
    }

    #[test]
    fn complement_is_orthonormal_and_orthogonal_to_constraints() {
        let n = 6;
        let mut c = DMatrix::<f64>::zeros(n, 2);
        for i in 0..n {
            c[(i, 0)] = 1.0 / n as f64;
            if i < 3 {
                c[(i, 1)] = 1.0 / n as f64;
            }
        }
        let basis = orthonormal_complement(&c).unwrap();
        assert_eq!(basis.shape(), (n, n - 2));

        let gram = basis.transpose() * &basis;
        assert!((gram - DMatrix::<f64>::identity(n - 2, n - 2)).abs().max() < 1e-12);

        let proj = c.transpose() * &basis;
        assert!(proj.abs().max() < 1e-12);
    }

    #[test]
    fn dependent_constraints_have_no_complement() {
        let c = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        assert!(orthonormal_complement(&c).is_none());
    }
}
