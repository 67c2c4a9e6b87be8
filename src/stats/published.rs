//! Historical test results quoted in the report commentary.
//!
//! These numbers were produced once, offline, from the full campaign export
//! (male vs female CTR). They are shown as they were published and are not
//! derived from whatever file the current run loads. Use `--recompute-stats`
//! for numbers computed from the loaded rows.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PublishedResults {
    pub shapiro_male_ctr_p: f64,
    pub shapiro_female_ctr_p: f64,
    pub mann_whitney_u: f64,
    pub mann_whitney_p: f64,
    /// Text form of the Mann-Whitney p-value exactly as it was published.
    pub mann_whitney_p_text: &'static str,
}

pub const PUBLISHED: PublishedResults = PublishedResults {
    shapiro_male_ctr_p: 3.988559358954938e-18,
    shapiro_female_ctr_p: 1.8043290664073437e-13,
    mann_whitney_u: 50333.5,
    mann_whitney_p: 1.095e-8,
    mann_whitney_p_text: "1.095 × 10⁻⁸",
};
