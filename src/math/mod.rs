//! Numerical utilities: quadrature rules and small dense linear algebra.

pub mod linalg;
pub mod quadrature;

pub use linalg::*;
pub use quadrature::*;
