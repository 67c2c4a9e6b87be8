//! Campaign subset used by the pairwise grid.

use crate::domain::{AdRecord, CampaignId};

/// Keep rows of the target campaigns that have all five core numeric columns.
pub fn campaign_subset<'a>(records: &'a [AdRecord], campaigns: &[CampaignId]) -> Vec<&'a AdRecord> {
    records
        .iter()
        .filter(|r| campaigns.contains(&r.campaign_id))
        .filter(|r| r.is_complete())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    fn record(campaign: &str, spent: Option<f64>) -> AdRecord {
        AdRecord {
            campaign_id: CampaignId::new(campaign),
            gender: Gender::F,
            impressions: Some(10),
            clicks: Some(1),
            spent,
            total_conversion: Some(1),
            approved_conversion: Some(0),
        }
    }

    #[test]
    fn keeps_only_target_campaigns_with_complete_rows() {
        let records = vec![
            record("916", Some(1.0)),
            record("1178", None),
            record("100", Some(2.0)),
            record("936", Some(3.0)),
        ];
        let targets: Vec<CampaignId> = ["1178", "936", "916"].into_iter().map(CampaignId::from).collect();

        let subset = campaign_subset(&records, &targets);
        let ids: Vec<&str> = subset.iter().map(|r| r.campaign_id.as_str()).collect();
        assert_eq!(ids, vec!["916", "936"]);
    }
}
