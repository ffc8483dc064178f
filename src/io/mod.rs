//! Input/output helpers.
//!
//! - model configuration JSON (`config`)
//! - layout and sweep exports (`export`)

pub mod config;
pub mod export;

pub use config::*;
pub use export::*;
