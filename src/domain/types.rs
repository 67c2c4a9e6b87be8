//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation and figure building
//! - exported to JSON/CSV
//! - handed to any presentation back-end (terminal, HTML, TUI)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Only the first `ROW_LIMIT` data rows of the input are ever consumed.
pub const ROW_LIMIT: usize = 761;

/// Campaigns shown in the pairwise grid, in series order.
pub const TARGET_CAMPAIGNS: [&str; 3] = ["1178", "936", "916"];

/// Metrics of the pairwise scatter grid, in row/column order.
pub const PAIRWISE_METRICS: [Metric; 5] = [
    Metric::Impressions,
    Metric::Clicks,
    Metric::Spent,
    Metric::TotalConversion,
    Metric::ApprovedConversion,
];

/// Metrics of the stacked bar comparison, one panel each.
pub const STACKED_METRICS: [Metric; 3] = [Metric::Spent, Metric::Clicks, Metric::TotalConversion];

/// Binary audience segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    // Declaration order gives `F < M`, the order a sorted group-by produces.
    F,
    M,
}

impl Gender {
    /// Display order used by every gender-split chart.
    pub const DISPLAY_ORDER: [Gender; 2] = [Gender::M, Gender::F];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }

    /// Parse a gender cell (`M`/`F`, case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "M" | "m" => Some(Gender::M),
            "F" | "f" => Some(Gender::F),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Categorical campaign key.
///
/// Kept as text: ids are compared and sorted as strings, so `"1178" < "916"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(value: &str) -> Self {
        CampaignId::new(value)
    }
}

/// Raw numeric columns of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Impressions,
    Clicks,
    Spent,
    TotalConversion,
    ApprovedConversion,
}

impl Metric {
    /// Column name as it appears in the input file (and on chart axes).
    pub fn column(self) -> &'static str {
        match self {
            Metric::Impressions => "impressions",
            Metric::Clicks => "clicks",
            Metric::Spent => "spent",
            Metric::TotalConversion => "total_conversion",
            Metric::ApprovedConversion => "approved_conversion",
        }
    }

    /// Column name with the first letter upper-cased and the rest lower-cased.
    pub fn capitalized(self) -> String {
        let column = self.column();
        let mut chars = column.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }

    /// Read this metric from a record (`None` when the cell was empty).
    pub fn value(self, record: &AdRecord) -> Option<f64> {
        match self {
            Metric::Impressions => record.impressions.map(|v| v as f64),
            Metric::Clicks => record.clicks.map(|v| v as f64),
            Metric::Spent => record.spent,
            Metric::TotalConversion => record.total_conversion.map(|v| v as f64),
            Metric::ApprovedConversion => record.approved_conversion.map(|v| v as f64),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.column())
    }
}

/// One advertisement row.
///
/// Numeric cells are optional: an empty cell stays absent rather than
/// becoming zero, so sums skip it and the campaign subset drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub campaign_id: CampaignId,
    pub gender: Gender,
    pub impressions: Option<u64>,
    pub clicks: Option<u64>,
    pub spent: Option<f64>,
    pub total_conversion: Option<u64>,
    pub approved_conversion: Option<u64>,
}

impl AdRecord {
    /// True when all five core numeric columns are present.
    pub fn is_complete(&self) -> bool {
        PAIRWISE_METRICS.iter().all(|m| m.value(self).is_some())
    }
}

/// Where the statistical-test numbers in the report come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsMode {
    /// Only the historical published results are shown.
    Published,
    /// Published results plus a block recomputed from the loaded rows.
    Recomputed,
}

/// Inputs that shape the report (everything except the rows themselves).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub target_campaigns: Vec<CampaignId>,
    pub pairwise_metrics: Vec<Metric>,
    pub stats_mode: StatsMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_campaigns: TARGET_CAMPAIGNS.iter().map(|&id| CampaignId::new(id)).collect(),
            pairwise_metrics: PAIRWISE_METRICS.to_vec(),
            stats_mode: StatsMode::Published,
        }
    }
}

/// A full `abdash report` run as understood by the app layer.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub report: ReportConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    pub export_html: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalized_lowers_the_tail() {
        assert_eq!(Metric::Spent.capitalized(), "Spent");
        assert_eq!(Metric::TotalConversion.capitalized(), "Total_conversion");
    }

    #[test]
    fn gender_sorts_f_before_m() {
        let mut genders = vec![Gender::M, Gender::F];
        genders.sort();
        assert_eq!(genders, vec![Gender::F, Gender::M]);
    }

    #[test]
    fn campaign_ids_sort_as_text() {
        let mut ids: Vec<CampaignId> = ["936", "1178", "916"].into_iter().map(CampaignId::from).collect();
        ids.sort();
        let ids: Vec<&str> = ids.iter().map(CampaignId::as_str).collect();
        assert_eq!(ids, vec!["1178", "916", "936"]);
    }
}
