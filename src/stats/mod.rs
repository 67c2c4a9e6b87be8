//! Statistics: the two tests quoted by the report,
//! box-plot summaries, and the historical published results.

pub mod mann_whitney;
pub mod published;
pub mod shapiro;
pub mod summary;

pub use mann_whitney::{MannWhitney, mann_whitney_u};
pub use published::{PUBLISHED, PublishedResults};
pub use shapiro::{ShapiroWilk, shapiro_wilk};
pub use summary::{BoxSummary, box_summary};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::analysis::DerivedRow;
use crate::domain::Gender;

/// Degenerate inputs to a statistical test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("need at least {needed} observations, got {got}")]
    TooFewObservations { needed: usize, got: usize },

    #[error("at most {max} observations supported, got {got}")]
    TooManyObservations { max: usize, got: usize },

    #[error("all observations are identical")]
    ZeroRange,

    #[error("sample contains non-finite values")]
    NonFinite,

    #[error("one of the samples is empty")]
    EmptySample,
}

/// Gender CTR tests recomputed from loaded rows.
#[derive(Debug, Clone, Serialize)]
pub struct GenderCtrTests {
    pub shapiro_male: ShapiroWilk,
    pub shapiro_female: ShapiroWilk,
    /// Male sample first, so `u` is the male statistic.
    pub mann_whitney: MannWhitney,
}

/// Defined CTR values for one gender, in row order.
pub fn ctr_values(rows: &[DerivedRow], gender: Gender) -> Vec<f64> {
    rows.iter()
        .filter(|r| r.record.gender == gender)
        .filter_map(|r| r.ctr)
        .collect()
}

/// Shapiro-Wilk on each gender's CTR, then Mann-Whitney U (M vs F).
pub fn gender_ctr_tests(rows: &[DerivedRow]) -> Result<GenderCtrTests, StatsError> {
    let male = ctr_values(rows, Gender::M);
    let female = ctr_values(rows, Gender::F);
    debug!(male = male.len(), female = female.len(), "running gender CTR tests");

    Ok(GenderCtrTests {
        shapiro_male: shapiro_wilk(&male)?,
        shapiro_female: shapiro_wilk(&female)?,
        mann_whitney: mann_whitney_u(&male, &female)?,
    })
}
