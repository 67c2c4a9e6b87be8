//! Group-by aggregates.
//!
//! Ratios on grouped views are recomputed from the summed columns (ratio of
//! sums). Averaging the per-row ratios would weight a 10-impression row the
//! same as a 10 000-impression row.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::derive::{conversion_rate, ctr};
use crate::domain::{AdRecord, CampaignId, Gender, Metric};

/// Column sums for one group. Missing cells contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotals {
    pub rows: usize,
    pub impressions: u64,
    pub clicks: u64,
    pub spent: f64,
    pub total_conversion: u64,
    pub approved_conversion: u64,
}

impl GroupTotals {
    fn add(&mut self, r: &AdRecord) {
        self.rows += 1;
        self.impressions += r.impressions.unwrap_or(0);
        self.clicks += r.clicks.unwrap_or(0);
        self.spent += r.spent.unwrap_or(0.0);
        self.total_conversion += r.total_conversion.unwrap_or(0);
        self.approved_conversion += r.approved_conversion.unwrap_or(0);
    }

    /// CTR of the summed columns (undefined with zero impressions).
    pub fn ctr(&self) -> Option<f64> {
        ctr(self.clicks as f64, self.impressions as f64)
    }

    /// Conversion rate of the summed columns (zero clicks count as one).
    pub fn conversion_rate(&self) -> f64 {
        conversion_rate(self.approved_conversion as f64, self.clicks as f64)
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Impressions => self.impressions as f64,
            Metric::Clicks => self.clicks as f64,
            Metric::Spent => self.spent,
            Metric::TotalConversion => self.total_conversion as f64,
            Metric::ApprovedConversion => self.approved_conversion as f64,
        }
    }
}

/// Totals for one gender.
#[derive(Debug, Clone, Serialize)]
pub struct GenderSummary {
    pub gender: Gender,
    pub totals: GroupTotals,
    pub ctr: Option<f64>,
    pub conversion_rate: f64,
}

/// Totals for one (campaign, gender) pair.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignGenderSummary {
    pub campaign_id: CampaignId,
    pub gender: Gender,
    pub totals: GroupTotals,
    pub ctr: Option<f64>,
    pub conversion_rate: f64,
}

/// Sum by gender, ordered `F`, `M`.
pub fn by_gender(records: &[AdRecord]) -> Vec<GenderSummary> {
    let mut groups: BTreeMap<Gender, GroupTotals> = BTreeMap::new();
    for r in records {
        groups.entry(r.gender).or_default().add(r);
    }

    groups
        .into_iter()
        .map(|(gender, totals)| GenderSummary {
            gender,
            ctr: totals.ctr(),
            conversion_rate: totals.conversion_rate(),
            totals,
        })
        .collect()
}

/// Sum by (campaign, gender), ordered by campaign id (as text) then gender.
pub fn by_campaign_gender(records: &[AdRecord]) -> Vec<CampaignGenderSummary> {
    let mut groups: BTreeMap<(CampaignId, Gender), GroupTotals> = BTreeMap::new();
    for r in records {
        groups.entry((r.campaign_id.clone(), r.gender)).or_default().add(r);
    }

    groups
        .into_iter()
        .map(|((campaign_id, gender), totals)| CampaignGenderSummary {
            campaign_id,
            gender,
            ctr: totals.ctr(),
            conversion_rate: totals.conversion_rate(),
            totals,
        })
        .collect()
}

/// Look up one gender in a `by_gender` result.
pub fn find_gender(summaries: &[GenderSummary], gender: Gender) -> Option<&GenderSummary> {
    summaries.iter().find(|s| s.gender == gender)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(campaign: &str, gender: Gender, impressions: u64, clicks: u64, approved: u64) -> AdRecord {
        AdRecord {
            campaign_id: CampaignId::new(campaign),
            gender,
            impressions: Some(impressions),
            clicks: Some(clicks),
            spent: Some(clicks as f64 * 1.5),
            total_conversion: Some(approved + 1),
            approved_conversion: Some(approved),
        }
    }

    #[test]
    fn grouped_ctr_is_ratio_of_sums() {
        let records = vec![record("916", Gender::M, 100, 10, 0), record("916", Gender::M, 200, 20, 0)];
        let summary = by_gender(&records);
        let m = find_gender(&summary, Gender::M).unwrap();

        assert_eq!(m.totals.clicks, 30);
        assert_eq!(m.totals.impressions, 300);
        assert!((m.ctr.unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn ratio_of_sums_differs_from_mean_of_ratios() {
        let records = vec![record("916", Gender::F, 10, 5, 0), record("916", Gender::F, 1000, 10, 0)];
        let f = &by_gender(&records)[0];
        let mean_of_ratios = (5.0 / 10.0 + 10.0 / 1000.0) / 2.0;
        assert!((f.ctr.unwrap() - 15.0 / 1010.0).abs() < 1e-12);
        assert!((f.ctr.unwrap() - mean_of_ratios).abs() > 0.1);
    }

    #[test]
    fn grouped_conversion_rate_guards_zero_clicks() {
        let records = vec![record("936", Gender::F, 100, 0, 3)];
        let f = &by_gender(&records)[0];
        assert_eq!(f.conversion_rate, 3.0);
    }

    #[test]
    fn gender_groups_are_sorted() {
        let records = vec![record("916", Gender::M, 1, 1, 0), record("916", Gender::F, 1, 1, 0)];
        let genders: Vec<Gender> = by_gender(&records).iter().map(|s| s.gender).collect();
        assert_eq!(genders, vec![Gender::F, Gender::M]);
    }

    #[test]
    fn campaign_gender_groups_sum_and_sort() {
        let records = vec![
            record("936", Gender::M, 100, 4, 1),
            record("1178", Gender::F, 100, 2, 0),
            record("936", Gender::M, 100, 6, 1),
            record("936", Gender::F, 100, 1, 1),
        ];
        let groups = by_campaign_gender(&records);
        let keys: Vec<(&str, Gender)> = groups.iter().map(|g| (g.campaign_id.as_str(), g.gender)).collect();
        assert_eq!(keys, vec![("1178", Gender::F), ("936", Gender::F), ("936", Gender::M)]);

        let m936 = &groups[2];
        assert_eq!(m936.totals.rows, 2);
        assert_eq!(m936.totals.clicks, 10);
        assert_eq!(m936.totals.approved_conversion, 2);
        assert!((m936.conversion_rate - 0.2).abs() < 1e-12);
        assert!((m936.totals.metric(Metric::Spent) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn missing_cells_are_skipped_in_sums() {
        let mut a = record("916", Gender::M, 100, 10, 1);
        a.clicks = None;
        let b = record("916", Gender::M, 100, 10, 1);
        let m = &by_gender(&[a, b])[0];
        assert_eq!(m.totals.clicks, 10);
        assert_eq!(m.totals.impressions, 200);
    }
}
