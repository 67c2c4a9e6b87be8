//! Five-number summaries for box plots.

use serde::{Deserialize, Serialize};

/// Box plot geometry, computed the same way Plotly's default box trace does:
/// linear-interpolated quartiles and whiskers reaching the most extreme points
/// within 1.5 IQR of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

/// Summarise the finite values of `values` (`None` when there are none).
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&v, 0.25);
    let median = quantile_sorted(&v, 0.5);
    let q3 = quantile_sorted(&v, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let lower_whisker = v.iter().copied().find(|&x| x >= lo_fence).unwrap_or(q1);
    let upper_whisker = v.iter().rev().copied().find(|&x| x <= hi_fence).unwrap_or(q3);
    let outliers = v.iter().filter(|&&x| x < lo_fence || x > hi_fence).count();

    Some(BoxSummary {
        n: v.len(),
        min: v[0],
        q1,
        median,
        q3,
        max: v[v.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Linear interpolation between closest ranks (`(n - 1) * p` positioning).
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
