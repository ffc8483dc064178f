//! `hank-core` library crate.
//!
//! Builds a heterogeneous-agent (HANK) model up to the point where it can be
//! handed to a linear rational-expectations solver: the index registry, the
//! cash-on-hand and skill grids, the steady state and the degrees-of-freedom
//! normalization.
//!
//! The binary (`hank`) is a thin wrapper around this library so that core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod grid;
pub mod io;
pub mod math;
pub mod model;
pub mod normalize;
pub mod params;
pub mod registry;
pub mod report;
pub mod steady;
