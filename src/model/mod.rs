//! The one-asset HANK model: declarations, calibration, construction and
//! batch evaluation over prior draws.

pub mod build;
pub mod parameters;
pub mod sweep;
pub mod variables;

pub use build::*;
pub use parameters::*;
pub use sweep::*;
pub use variables::*;
