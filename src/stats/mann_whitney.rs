//! Two-sided Mann-Whitney U test.
//!
//! Uses the normal approximation with tie correction and a 0.5 continuity
//! correction. The reported statistic is `U` of the first sample.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::StatsError;

/// Test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitney {
    pub n_x: usize,
    pub n_y: usize,
    /// `U` for the first sample: how often an `x` beats a `y` (ties count half).
    pub u: f64,
    pub z: f64,
    pub p_value: f64,
}

pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<MannWhitney, StatsError> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let n = n1 + n2;

    let (ranks, tie_term) = average_ranks(x.iter().chain(y).copied().collect());
    let r1: f64 = ranks[..x.len()].iter().sum();
    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;

    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();
    if !(sigma > 0.0) {
        // Every observation tied: no evidence either way.
        return Ok(MannWhitney {
            n_x: x.len(),
            n_y: y.len(),
            u: u1,
            z: 0.0,
            p_value: 1.0,
        });
    }

    let u_max = u1.max(u2);
    let z = (u_max - mu - 0.5) / sigma;
    let p_value = (2.0 * Normal::standard().sf(z)).clamp(0.0, 1.0);

    Ok(MannWhitney {
        n_x: x.len(),
        n_y: y.len(),
        u: u1,
        z,
        p_value,
    })
}

/// Ranks (1-based, ties averaged) in input order, plus `Σ (t³ - t)` over tie groups.
fn average_ranks(values: Vec<f64>) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share the average of ranks start+1..=end.
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }

    (ranks, tie_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_samples() {
        let res = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(res.u, 0.0);
        // Asymptotic two-sided p with continuity correction: 0.0809
        assert!((res.p_value - 0.0809).abs() < 5e-4, "p={}", res.p_value);
    }

    #[test]
    fn swapping_samples_mirrors_u_and_keeps_p() {
        let a = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        let b = mann_whitney_u(&[4.0, 5.0, 6.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(b.u, 9.0);
        assert!((a.p_value - b.p_value).abs() < 1e-15);
    }

    #[test]
    fn ties_get_average_ranks() {
        let (ranks, tie_term) = average_ranks(vec![10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
        assert_eq!(tie_term, 6.0);

        let res = mann_whitney_u(&[1.0, 2.0, 2.0], &[2.0, 3.0]).unwrap();
        // x ranks: 1, 3, 3 -> R1 = 7, U1 = 7 - 6 = 1
        assert_eq!(res.u, 1.0);
    }

    #[test]
    fn identical_samples_are_not_significant() {
        let res = mann_whitney_u(&[5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(res.p_value, 1.0);
    }

    #[test]
    fn large_shift_is_significant() {
        let x: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..200).map(|i| i as f64 + 120.0).collect();
        let res = mann_whitney_u(&x, &y).unwrap();
        assert!(res.p_value < 1e-10, "p={}", res.p_value);
    }

    #[test]
    fn far_tail_p_value_stays_positive() {
        // z is about 17.3 here; 1 - cdf(z) would round to zero.
        let x: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..200).map(|i| i as f64 + 1000.0).collect();
        let res = mann_whitney_u(&x, &y).unwrap();
        assert!(res.z > 17.0, "z={}", res.z);
        assert!(res.p_value > 0.0 && res.p_value < 1e-60, "p={}", res.p_value);
    }

    #[test]
    fn empty_sample_is_an_error() {
        assert!(matches!(mann_whitney_u(&[], &[1.0]), Err(StatsError::EmptySample)));
    }
}
