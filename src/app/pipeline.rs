//! Shared "report pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> derive ratios -> filter subset -> aggregate -> figures -> dashboard blocks
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::analysis::{by_campaign_gender, by_gender, campaign_subset, derive_ratios};
use crate::charts::pairwise::NO_DATA_NOTICE;
use crate::charts::{GridOutcome, Ratio, distribution_by_gender, pairwise_grid, stacked_comparison};
use crate::domain::{AdRecord, ReportConfig, STACKED_METRICS, StatsMode};
use crate::error::AppError;
use crate::io::ingest::load_records;
use crate::report::{Block, Dashboard, campaign_summary_rows, commentary, gender_callouts};
use crate::stats::{PUBLISHED, gender_ctr_tests};

/// Load the input file and build the dashboard.
pub fn run_report(data_path: &Path, config: &ReportConfig) -> Result<Dashboard, AppError> {
    let ingest = load_records(data_path)?;
    let mut dashboard = build_dashboard(&ingest.records, config)?;
    dashboard.truncated = ingest.truncated;
    Ok(dashboard)
}

/// Build every dashboard block from an already-loaded table.
pub fn build_dashboard(records: &[AdRecord], config: &ReportConfig) -> Result<Dashboard, AppError> {
    let derived = derive_ratios(records);

    let subset: Vec<&AdRecord> = campaign_subset(records, &config.target_campaigns);
    info!(rows = records.len(), subset = subset.len(), "building dashboard");

    let gender_summary = by_gender(records);
    let campaign_summary = by_campaign_gender(records);

    let recomputed_stats = match config.stats_mode {
        StatsMode::Published => None,
        StatsMode::Recomputed => Some(gender_ctr_tests(&derived)?),
    };

    let mut blocks = vec![
        Block::title(commentary::TITLE),
        Block::markdown(commentary::INTRO),
        Block::subheader(commentary::pairwise_subheader(&config.target_campaigns)),
    ];

    match pairwise_grid(&subset, &config.pairwise_metrics, &config.target_campaigns) {
        GridOutcome::Figure(figure) => blocks.push(Block::Figure { figure }),
        GridOutcome::NoData => blocks.push(Block::Notice {
            text: NO_DATA_NOTICE.to_string(),
        }),
    }

    let (totals, rates) = gender_callouts(&gender_summary);
    blocks.push(Block::subheader(commentary::KEY_METRICS_SUBHEADER));
    blocks.push(Block::Columns {
        columns: vec![vec![Block::Metrics { items: totals }], vec![Block::Metrics { items: rates }]],
    });

    blocks.push(Block::Figure {
        figure: stacked_comparison(&campaign_summary, &STACKED_METRICS),
    });
    blocks.push(Block::markdown(commentary::STACKED_NOTES));

    blocks.push(Block::subheader(commentary::AB_SUBHEADER));
    blocks.push(Block::Columns {
        columns: vec![
            vec![
                Block::subheader(commentary::CTR_BOX_SUBHEADER),
                Block::Figure {
                    figure: distribution_by_gender(&derived, Ratio::Ctr),
                },
            ],
            vec![
                Block::subheader(commentary::CONVERSION_BOX_SUBHEADER),
                Block::Figure {
                    figure: distribution_by_gender(&derived, Ratio::ConversionRate),
                },
            ],
        ],
    });
    blocks.push(Block::markdown(commentary::HYPOTHESES));

    blocks.push(Block::markdown(commentary::shapiro_male_line()));
    blocks.push(Block::markdown(commentary::shapiro_female_line()));
    blocks.push(Block::markdown(commentary::NORMALITY_VERDICT));

    blocks.push(Block::subheader(commentary::SUMMARY_SUBHEADER));
    blocks.push(Block::CampaignSummary {
        rows: campaign_summary_rows(&campaign_summary),
    });

    blocks.push(Block::markdown(commentary::mann_whitney_lines()));
    blocks.push(Block::markdown(commentary::CONCLUSION));
    blocks.push(Block::markdown(commentary::CTR_ANALYSIS));

    if let Some(tests) = &recomputed_stats {
        blocks.push(Block::markdown(commentary::recomputed_block(tests)));
    }

    debug!(blocks = blocks.len(), "dashboard assembled");

    Ok(Dashboard {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        rows_loaded: records.len(),
        truncated: false,
        blocks,
        gender_summary,
        campaign_summary,
        published_stats: PUBLISHED,
        recomputed_stats,
    })
}
