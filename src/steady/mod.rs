//! Steady-state solver: a validated graph of closed-form definitions.

pub mod definitions;
pub mod graph;

pub use definitions::*;
pub use graph::*;
