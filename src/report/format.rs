//! Terminal rendering of a dashboard.
//!
//! We keep formatting code in one place so:
//! - the analysis and chart code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::report::{Block, CampaignSummaryRow, Dashboard, MetricCallout};

/// Sketch size for figures; `None` prints a one-line placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: usize,
    pub height: usize,
}

/// Format the whole dashboard for a terminal.
pub fn format_dashboard(dashboard: &Dashboard, plot: Option<PlotSize>) -> String {
    let mut out = String::new();

    let suffix = if dashboard.truncated { " (truncated)" } else { "" };
    out.push_str(&format!(
        "Rows loaded: {}{suffix} | generated {}\n",
        dashboard.rows_loaded, dashboard.generated_at
    ));

    for block in &dashboard.blocks {
        format_block(&mut out, block, plot);
    }
    out
}

fn format_block(out: &mut String, block: &Block, plot: Option<PlotSize>) {
    match block {
        Block::Title { text } => {
            out.push_str(&format!("\n=== {text} ===\n"));
        }
        Block::Subheader { text } => {
            out.push_str(&format!("\n--- {text} ---\n"));
        }
        Block::Markdown { text } => {
            out.push_str(text);
            out.push('\n');
        }
        Block::Notice { text } => {
            out.push_str(&format!("WARNING: {text}\n"));
        }
        Block::Figure { figure } => match plot {
            Some(size) => out.push_str(&crate::plot::render_figure(figure, size.width, size.height)),
            None => {
                let title = figure.layout.title.as_deref().unwrap_or("untitled");
                out.push_str(&format!("[figure: {title}, {} traces]\n", figure.traces.len()));
            }
        },
        Block::Columns { columns } => {
            for column in columns {
                for b in column {
                    format_block(out, b, plot);
                }
            }
        }
        Block::Metrics { items } => out.push_str(&format_metrics(items)),
        Block::CampaignSummary { rows } => out.push_str(&format_summary_table(rows)),
    }
}

fn format_metrics(items: &[MetricCallout]) -> String {
    let mut out = String::new();
    for m in items {
        out.push_str(&format!("{:<24} {}\n", m.label, m.value));
    }
    out
}

/// Campaign × gender table.
pub fn format_summary_table(rows: &[CampaignSummaryRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:<6} {:>10} {:>12} {:>20} {:>16}",
            "campaign_id", "gender", "clicks", "spent", "approved_conversion", "conversion_rate"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<12} {:-<6} {:-<10} {:-<12} {:-<20} {:-<16}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<12} {:<6} {:>10} {:>12.2} {:>20} {:>16.4}",
                truncate(r.campaign_id.as_str(), 12),
                r.gender,
                r.clicks,
                r.spent,
                r.approved_conversion,
                r.conversion_rate,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignId, Gender};

    fn row(campaign: &str, gender: Gender) -> CampaignSummaryRow {
        CampaignSummaryRow {
            campaign_id: CampaignId::new(campaign),
            gender,
            clicks: 120,
            spent: 180.456,
            approved_conversion: 3,
            conversion_rate: 0.025,
        }
    }

    #[test]
    fn summary_table_layout() {
        let txt = format_summary_table(&[row("1178", Gender::F)]);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("campaign_id  gender"));
        assert!(lines[1].starts_with("------------ ------"));
        assert_eq!(
            lines[2],
            "1178         F             120       180.46                    3           0.0250"
        );
    }

    #[test]
    fn truncate_marks_cut_ids() {
        assert_eq!(truncate("abcdefghijklmnop", 6), "abcde.");
        assert_eq!(truncate("916", 6), "916");
    }

    #[test]
    fn dashboard_header_and_blocks() {
        let dashboard = Dashboard {
            generated_at: "2025-01-01T00:00:00Z".to_string(),
            rows_loaded: 761,
            truncated: true,
            blocks: vec![
                Block::title("Title"),
                Block::Notice {
                    text: "No data".to_string(),
                },
                Block::Metrics {
                    items: vec![MetricCallout {
                        label: "Total Clicks (M/F)".to_string(),
                        value: "3 / 4".to_string(),
                    }],
                },
            ],
            gender_summary: Vec::new(),
            campaign_summary: Vec::new(),
            published_stats: crate::stats::PUBLISHED,
            recomputed_stats: None,
        };

        let txt = format_dashboard(&dashboard, None);
        assert!(txt.starts_with("Rows loaded: 761 (truncated)"));
        assert!(txt.contains("\n=== Title ===\n"));
        assert!(txt.contains("WARNING: No data\n"));
        assert!(txt.contains("Total Clicks (M/F)       3 / 4\n"));
    }
}
