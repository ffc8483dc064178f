//! Domain types used throughout model construction.
//!
//! This module defines:
//!
//! - addressing types (`Symbol`, `IndexRange`, `Role`, `BlockKind`, `Namespace`)
//! - the typed static configuration (`ModelConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
