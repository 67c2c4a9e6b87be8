//! Per-row ratio metrics.

use serde::Serialize;

use crate::domain::AdRecord;

/// Click-through rate: `clicks / impressions`.
///
/// There is no zero guard on the denominator: with zero impressions the rate is
/// undefined and `None` is returned.
pub fn ctr(clicks: f64, impressions: f64) -> Option<f64> {
    if impressions == 0.0 {
        return None;
    }
    Some(clicks / impressions)
}

/// Conversion rate: `approved / clicks`, where zero clicks count as one click.
///
/// Only the denominator is floored, so zero clicks with approved conversions
/// yields the approved count itself.
pub fn conversion_rate(approved: f64, clicks: f64) -> f64 {
    let denom = if clicks == 0.0 { 1.0 } else { clicks };
    approved / denom
}

/// A record paired with its derived ratios.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedRow {
    pub record: AdRecord,
    pub ctr: Option<f64>,
    pub conversion_rate: Option<f64>,
}

/// Add CTR and conversion rate to every record.
pub fn derive_ratios(records: &[AdRecord]) -> Vec<DerivedRow> {
    records
        .iter()
        .map(|r| {
            let clicks = r.clicks.map(|v| v as f64);
            let impressions = r.impressions.map(|v| v as f64);
            let approved = r.approved_conversion.map(|v| v as f64);

            DerivedRow {
                record: r.clone(),
                ctr: clicks.zip(impressions).and_then(|(c, i)| ctr(c, i)),
                conversion_rate: approved.zip(clicks).map(|(a, c)| conversion_rate(a, c)),
            }
        })
        .collect()
}
