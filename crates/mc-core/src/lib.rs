//! mc-core: Shared types for the Monte Carlo dice crates
//!
//! Face labels, validated face sets, weight checks and the common error type.
//! Every other crate in the workspace builds on these.

mod error;
mod face;
mod weight;

pub use error::*;
pub use face::*;
pub use weight::*;
