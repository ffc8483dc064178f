//! Reporting: formatted terminal output for the CLI.
//!
//! Formatting lives in one place so the model code stays free of presentation
//! concerns.

pub mod format;

pub use format::*;
