//! Index registry: which slice of the flat state/equation/shock vectors belongs
//! to which symbol.
//!
//! - `builder`: declarations → validated, frozen [`IndexRegistry`]
//! - `layout`: per-namespace layouts and the unnormalized registry
//! - `normalized`: ranges after degrees-of-freedom removal, plus augmented states

pub mod builder;
pub mod layout;
pub mod normalized;

pub use builder::*;
pub use layout::*;
pub use normalized::*;
