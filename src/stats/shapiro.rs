//! Shapiro-Wilk test for normality.
//!
//! Royston's (1995) approximation:
//! - coefficients from normal order-statistic scores with polynomial corrections for the two
//!   most extreme pairs
//! - `W` computed as the squared correlation between the sorted sample and the coefficients
//! - p-value from a normalising transform of `ln(1 - W)` (separate fits for `n <= 11` and `n >= 12`)
//!
//! Valid for `3 <= n <= 5000`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::StatsError;

pub const MIN_N: usize = 3;
pub const MAX_N: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    pub n: usize,
    pub w: f64,
    pub p_value: f64,
}

/// Run the test on `sample` (order does not matter; non-finite values are rejected).
pub fn shapiro_wilk(sample: &[f64]) -> Result<ShapiroWilk, StatsError> {
    let n = sample.len();
    if n < MIN_N {
        return Err(StatsError::TooFewObservations { needed: MIN_N, got: n });
    }
    if n > MAX_N {
        return Err(StatsError::TooManyObservations { max: MAX_N, got: n });
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }

    let mut x = sample.to_vec();
    x.sort_by(f64::total_cmp);

    let range = x[n - 1] - x[0];
    if range < 1e-19 {
        return Err(StatsError::ZeroRange);
    }

    let half = coefficients(n);
    let coef: Vec<f64> = (0..n)
        .map(|i| {
            let j = n - 1 - i;
            match i.cmp(&j) {
                std::cmp::Ordering::Less => -half[i],
                std::cmp::Ordering::Greater => half[j],
                std::cmp::Ordering::Equal => 0.0,
            }
        })
        .collect();

    // Squared correlation between coefficients and data, written as `1 - w1`
    // so values of W close to 1 keep their precision.
    let xs: Vec<f64> = x.iter().map(|v| v / range).collect();
    let mean_a = coef.iter().sum::<f64>() / n as f64;
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let (mut ssa, mut ssx, mut sax) = (0.0, 0.0, 0.0);
    for (a, v) in coef.iter().zip(&xs) {
        let da = a - mean_a;
        let dx = v - mean_x;
        ssa += da * da;
        ssx += dx * dx;
        sax += da * dx;
    }
    let ssassx = (ssa * ssx).sqrt();
    let w1 = ((ssassx - sax) * (ssassx + sax) / (ssa * ssx)).max(0.0);
    let w = 1.0 - w1;

    Ok(ShapiroWilk {
        n,
        w,
        p_value: p_value(n, w, w1),
    })
}

/// Positive half of the antisymmetric coefficient vector, most extreme pair first.
fn coefficients(n: usize) -> Vec<f64> {
    let nn2 = n / 2;
    if n == 3 {
        return vec![0.5_f64.sqrt()];
    }

    let an = n as f64;
    let an25 = an + 0.25;
    // Scores of the lower half (negative values).
    let normal = Normal::standard();
    let m: Vec<f64> = (1..=nn2).map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25)).collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; nn2];
    a[0] = a1;

    let (first_plain, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1]) / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2)).sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };

    for i in first_plain..nn2 {
        a[i] = -m[i] / fac;
    }
    a
}

fn p_value(n: usize, w: f64, w1: f64) -> f64 {
    if n == 3 {
        // Exact distribution for n = 3.
        let stqr = (0.75_f64).sqrt().asin();
        let p = 6.0 / PI * (w.max(0.75).sqrt().asin() - stqr);
        return p.clamp(0.0, 1.0);
    }

    let an = n as f64;
    let mut y = w1.ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    Normal::standard().sf((y - m) / s).clamp(0.0, 1.0)
}

/// `c[0] + c[1] x + c[2] x^2 + ...`
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected normal scores: the most "normal" sample of size n there is.
    fn normal_scores(n: usize) -> Vec<f64> {
        let normal = Normal::standard();
        (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
            .collect()
    }

    #[test]
    fn normal_scores_give_w_near_one() {
        let res = shapiro_wilk(&normal_scores(100)).unwrap();
        assert!(res.w > 0.99, "w={}", res.w);
        assert!(res.p_value > 0.5, "p={}", res.p_value);
    }

    #[test]
    fn heavily_skewed_sample_is_rejected() {
        let sample: Vec<f64> = (1..=60).map(|i| (i as f64 / 6.0).exp()).collect();
        let res = shapiro_wilk(&sample).unwrap();
        assert!(res.w < 0.85, "w={}", res.w);
        assert!(res.p_value < 1e-4, "p={}", res.p_value);
    }

    #[test]
    fn small_samples_use_the_short_branch() {
        let res = shapiro_wilk(&[2.1, 3.4, 1.9, 5.6, 4.0, 3.3, 2.8]).unwrap();
        assert!(res.w > 0.0 && res.w <= 1.0);
        assert!(res.p_value > 0.05, "p={}", res.p_value);
    }

    #[test]
    fn three_points_evenly_spaced_are_perfectly_normal() {
        let res = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!((res.w - 1.0).abs() < 1e-12);
        assert!((res.p_value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn order_does_not_matter() {
        let a = shapiro_wilk(&[3.0, 1.0, 4.0, 1.5, 5.0, 9.0, 2.0, 6.0]).unwrap();
        let b = shapiro_wilk(&[1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 9.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert!(matches!(shapiro_wilk(&[1.0, 2.0]), Err(StatsError::TooFewObservations { .. })));
        assert!(matches!(shapiro_wilk(&[2.0; 10]), Err(StatsError::ZeroRange)));
        assert!(matches!(shapiro_wilk(&[1.0, f64::NAN, 3.0]), Err(StatsError::NonFinite)));
    }
}
