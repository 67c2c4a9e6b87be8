//! Synthetic advertising dataset generation.
//!
//! Produces a CSV shaped like the campaign export the dashboard reads, with
//! per-campaign scale differences and a slightly higher female CTR, so the
//! dashboard can be demoed and tested without the real data.

use std::fs::File;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution, LogNormal, Normal, Poisson};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;

/// Row count of the real export.
pub const DEFAULT_ROWS: usize = 1143;
pub const DEFAULT_SEED: u64 = 42;

const AGE_BRACKETS: [&str; 4] = ["30-34", "35-39", "40-44", "45-49"];

/// Per-campaign generation profile.
struct CampaignProfile {
    id: &'static str,
    /// Relative share of rows.
    weight: f64,
    /// Median impressions per ad.
    median_impressions: f64,
    /// Mean extra conversions beyond the first.
    conversions: f64,
}

const CAMPAIGNS: [CampaignProfile; 3] = [
    CampaignProfile {
        id: "916",
        weight: 54.0,
        median_impressions: 9_000.0,
        conversions: 0.3,
    },
    CampaignProfile {
        id: "936",
        weight: 464.0,
        median_impressions: 20_000.0,
        conversions: 0.6,
    },
    CampaignProfile {
        id: "1178",
        weight: 625.0,
        median_impressions: 250_000.0,
        conversions: 3.0,
    },
];

/// One generated ad row. Field names are the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub ad_id: u64,
    pub campaign_id: String,
    pub fb_campaign_id: u64,
    pub age: String,
    pub gender: String,
    pub interest: u32,
    pub impressions: u64,
    pub clicks: u64,
    pub spent: f64,
    pub total_conversion: u64,
    pub approved_conversion: u64,
}

/// Generate `rows` ad rows from `seed`. Same inputs, same rows.
pub fn generate_sample(rows: usize, seed: u64) -> Result<Vec<SampleRow>, AppError> {
    if rows == 0 {
        return Err(AppError::new(2, "Sample row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let cpc = Normal::new(1.45_f64, 0.25).map_err(dist_err)?;
    let total_weight: f64 = CAMPAIGNS.iter().map(|c| c.weight).sum();

    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let pick = rng.gen_range(0.0..total_weight);
        let mut acc = 0.0;
        let campaign = CAMPAIGNS
            .iter()
            .find(|c| {
                acc += c.weight;
                pick < acc
            })
            .unwrap_or(&CAMPAIGNS[CAMPAIGNS.len() - 1]);

        let male = rng.gen_bool(0.52);

        let impressions_dist = LogNormal::new(campaign.median_impressions.ln(), 0.9).map_err(dist_err)?;
        let impressions = impressions_dist.sample(&mut rng).round().max(100.0) as u64;

        // Female audiences click a little more often.
        let ctr_mean: f64 = if male { 0.00016 } else { 0.00021 };
        let ctr = (ctr_mean * (1.0 + 0.5 * rng.gen_range(-1.0..1.0_f64))).clamp(0.0, 1.0);
        let clicks = Binomial::new(impressions, ctr).map_err(dist_err)?.sample(&mut rng);

        let spent = if clicks == 0 {
            0.0
        } else {
            let per_click = cpc.sample(&mut rng).max(0.2);
            (clicks as f64 * per_click * 100.0).round() / 100.0
        };

        let extra = Poisson::new(campaign.conversions).map_err(dist_err)?;
        let total_conversion = 1 + extra.sample(&mut rng) as u64;
        let approved_conversion = Binomial::new(total_conversion, 0.35)
            .map_err(dist_err)?
            .sample(&mut rng);

        out.push(SampleRow {
            ad_id: 708_746 + i as u64,
            campaign_id: campaign.id.to_string(),
            fb_campaign_id: 103_916 + (i / 3) as u64,
            age: AGE_BRACKETS[rng.gen_range(0..AGE_BRACKETS.len())].to_string(),
            gender: if male { "M" } else { "F" }.to_string(),
            interest: rng.gen_range(2..=114),
            impressions,
            clicks,
            spent,
            total_conversion,
            approved_conversion,
        });
    }

    Ok(out)
}

fn dist_err(e: impl std::fmt::Display) -> AppError {
    AppError::new(4, format!("Sample distribution error: {e}"))
}

/// Write generated rows as CSV.
pub fn write_sample_csv(path: &Path, rows: &[SampleRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    write_sample(file, rows)?;

    info!(path = %path.display(), rows = rows.len(), "sample CSV written");
    Ok(())
}

fn write_sample<W: std::io::Write>(out: W, rows: &[SampleRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for r in rows {
        writer
            .serialize(r)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV: {e}")))?;
    Ok(())
}
