//! Figure construction.
//!
//! Builders are pure functions from shaped data to a declarative `Figure`;
//! none of them draws anything.
//!
//! - `pairwise`: lower-triangle scatter grid by campaign
//! - `stacked`: stacked bars by campaign and gender
//! - `distribution`: box plots of a ratio by gender
//! - `palette`: fixed campaign and gender colours

pub mod distribution;
pub mod figure;
pub mod pairwise;
pub mod palette;
pub mod stacked;

pub use distribution::{Ratio, distribution_by_gender};
pub use figure::*;
pub use pairwise::{GridOutcome, pairwise_grid};
pub use stacked::stacked_comparison;
