//! Quadrature rules and the standard normal CDF.
//!
//! - Gauss–Legendre nodes/weights on `[-1, 1]`, found by Newton iteration on
//!   the three-term Legendre recurrence. Initial guesses
//!   `cos(π (i + 3/4) / (n + 1/2))` converge in a handful of steps even for
//!   several hundred nodes.
//! - `normal_cdf` uses a Chebyshev-fitted `erfc` (fractional error below
//!   `1.2e-7` everywhere), which is ample for Tauchen transition rows that are
//!   renormalized afterwards anyway.

use std::f64::consts::{PI, SQRT_2};

/// Newton convergence threshold for Legendre roots.
const ROOT_EPS: f64 = 1e-15;

/// Newton iterations before giving up on a root refinement.
const MAX_NEWTON: usize = 100;

/// Gauss–Legendre nodes (ascending) and weights on `[-1, 1]`.
///
/// Weights sum to 2. Returns empty vectors for `n = 0`.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    let nf = n as f64;

    for i in 0..n.div_ceil(2) {
        let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
        let mut dp = 0.0;

        for _ in 0..MAX_NEWTON {
            let (p, p_prev) = legendre_pair(n, z);
            dp = nf * (z * p - p_prev) / (z * z - 1.0);
            let step = p / dp;
            z -= step;
            if step.abs() < ROOT_EPS {
                break;
            }
        }
        // Re-evaluate the derivative at the converged root.
        let (p, p_prev) = legendre_pair(n, z);
        if p.is_finite() && p_prev.is_finite() {
            dp = nf * (z * p - p_prev) / (z * z - 1.0);
        }

        let w = 2.0 / ((1.0 - z * z) * dp * dp);
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    (nodes, weights)
}

/// `(P_n(z), P_{n-1}(z))` by the three-term recurrence.
fn legendre_pair(n: usize, z: f64) -> (f64, f64) {
    let mut p = 1.0;
    let mut p_prev = 0.0;
    for j in 1..=n {
        let jf = j as f64;
        let p_next = ((2.0 * jf - 1.0) * z * p - (jf - 1.0) * p_prev) / jf;
        p_prev = p;
        p = p_next;
    }
    (p, p_prev)
}

/// Complementary error function.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}
