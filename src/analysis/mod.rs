//! Data shaping: derived ratios, the campaign subset, and group-by aggregates.
//!
//! Everything here is a pure transform over the loaded table.

pub mod aggregate;
pub mod derive;
pub mod filter;

pub use aggregate::*;
pub use derive::*;
pub use filter::*;
