//! Discretization of the two heterogeneity dimensions.
//!
//! - `skill`: persistent skill as a Markov chain (exact two-state or Tauchen)
//! - `cash`: Gauss–Legendre cash-on-hand grid bounded by steady-state prices
//! - `total`: their skill-major cross product and the published grid scalars

pub mod cash;
pub mod skill;
pub mod total;

pub use cash::*;
pub use skill::*;
pub use total::*;
