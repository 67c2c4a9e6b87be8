//! The assembled dashboard: an ordered list of blocks plus the data behind them.
//!
//! We keep presentation-neutral structure here so:
//! - the pipeline produces one value that every back-end can consume
//! - the JSON export is simply this structure serialised

use serde::Serialize;

use crate::analysis::{CampaignGenderSummary, GenderSummary, find_gender};
use crate::charts::Figure;
use crate::domain::{CampaignId, Gender};
use crate::stats::{GenderCtrTests, PublishedResults};

pub mod commentary;
pub mod format;

pub use format::format_dashboard;

/// One labelled number pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCallout {
    pub label: String,
    pub value: String,
}

/// A row of the campaign × gender summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummaryRow {
    pub campaign_id: CampaignId,
    pub gender: Gender,
    pub clicks: u64,
    pub spent: f64,
    pub approved_conversion: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Title { text: String },
    Subheader { text: String },
    Markdown { text: String },
    /// A warning shown in place of content that could not be produced.
    Notice { text: String },
    Figure { figure: Figure },
    /// Blocks laid out side by side.
    Columns { columns: Vec<Vec<Block>> },
    Metrics { items: Vec<MetricCallout> },
    CampaignSummary { rows: Vec<CampaignSummaryRow> },
}

impl Block {
    pub fn title(text: impl Into<String>) -> Self {
        Block::Title { text: text.into() }
    }

    pub fn subheader(text: impl Into<String>) -> Self {
        Block::Subheader { text: text.into() }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Block::Markdown { text: text.into() }
    }

    /// Short label for lists (TUI navigation, logs).
    pub fn label(&self) -> String {
        match self {
            Block::Title { text } | Block::Subheader { text } => text.clone(),
            Block::Markdown { text } => first_line(text),
            Block::Notice { text } => format!("⚠ {}", first_line(text)),
            Block::Figure { figure } => figure.layout.title.clone().unwrap_or_else(|| "Figure".to_string()),
            Block::Columns { columns } => columns
                .iter()
                .filter_map(|col| col.first().map(Block::label))
                .collect::<Vec<_>>()
                .join(" | "),
            Block::Metrics { .. } => "Key metrics".to_string(),
            Block::CampaignSummary { .. } => "Campaign summary table".to_string(),
        }
    }
}

fn first_line(text: &str) -> String {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim().to_string()
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: String,
    pub rows_loaded: usize,
    /// The input had more rows than the analysis keeps.
    pub truncated: bool,
    pub blocks: Vec<Block>,
    pub gender_summary: Vec<GenderSummary>,
    pub campaign_summary: Vec<CampaignGenderSummary>,
    /// Historical numbers quoted by the commentary.
    pub published_stats: PublishedResults,
    pub recomputed_stats: Option<GenderCtrTests>,
}

impl Dashboard {
    /// All figures in page order, including those nested in columns.
    pub fn figures(&self) -> Vec<&Figure> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Figure>) {
            for b in blocks {
                match b {
                    Block::Figure { figure } => out.push(figure),
                    Block::Columns { columns } => columns.iter().for_each(|c| collect(c, out)),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.blocks, &mut out);
        out
    }

    pub fn notices(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Notice { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// The two call-out columns: totals (clicks, spend) and rates (CTR, conversion).
///
/// Each value reads `M / F`; a gender absent from the data shows `-`.
pub fn gender_callouts(summary: &[GenderSummary]) -> (Vec<MetricCallout>, Vec<MetricCallout>) {
    let m = find_gender(summary, Gender::M);
    let f = find_gender(summary, Gender::F);

    let pair = |fmt: &dyn Fn(&GenderSummary) -> String| {
        let side = |s: Option<&GenderSummary>| s.map(fmt).unwrap_or_else(|| "-".to_string());
        format!("{} / {}", side(m), side(f))
    };
    let pct = |v: Option<f64>| v.map(|x| format!("{:.2}%", x * 100.0)).unwrap_or_else(|| "-".to_string());

    let totals = vec![
        MetricCallout {
            label: "Total Clicks (M/F)".to_string(),
            value: pair(&|s| s.totals.clicks.to_string()),
        },
        MetricCallout {
            label: "Total Spend (M/F)".to_string(),
            value: pair(&|s| format!("${:.2}", s.totals.spent)),
        },
    ];
    let rates = vec![
        MetricCallout {
            label: "CTR (M/F)".to_string(),
            value: pair(&|s| pct(s.ctr)),
        },
        MetricCallout {
            label: "Conversion Rate (M/F)".to_string(),
            value: pair(&|s| pct(Some(s.conversion_rate))),
        },
    ];
    (totals, rates)
}

pub fn campaign_summary_rows(groups: &[CampaignGenderSummary]) -> Vec<CampaignSummaryRow> {
    groups
        .iter()
        .map(|g| CampaignSummaryRow {
            campaign_id: g.campaign_id.clone(),
            gender: g.gender,
            clicks: g.totals.clicks,
            spent: g.totals.spent,
            approved_conversion: g.totals.approved_conversion,
            conversion_rate: g.conversion_rate,
        })
        .collect()
}
