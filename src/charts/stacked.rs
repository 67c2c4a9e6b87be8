//! Stacked bar comparison: one panel per metric, bars per campaign stacked by gender.

use crate::analysis::CampaignGenderSummary;
use crate::charts::figure::{Axis, AxisTitle, BarMode, BarTrace, Cell, Figure, GridSpec, Layout, Margin, Trace};
use crate::charts::palette::gender_color;
use crate::domain::{Gender, Metric};

pub const TITLE: &str = "📊 Campaign Metrics by Gender (Stacked Bars)";

pub fn stacked_comparison(groups: &[CampaignGenderSummary], metrics: &[Metric]) -> Figure {
    let mut traces = Vec::new();
    let mut axis_titles = Vec::new();

    for (col, &metric) in metrics.iter().enumerate() {
        let cell = Cell::new(0, col);

        for gender in Gender::DISPLAY_ORDER {
            let (x, y): (Vec<String>, Vec<f64>) = groups
                .iter()
                .filter(|g| g.gender == gender)
                .map(|g| (g.campaign_id.to_string(), g.totals.metric(metric)))
                .unzip();

            traces.push(Trace::Bar(BarTrace {
                name: format!("{gender} - {metric}"),
                cell,
                x,
                y,
                color: gender_color(gender).to_string(),
                show_legend: col == 0,
            }));
        }

        axis_titles.push(AxisTitle {
            cell,
            axis: Axis::X,
            text: "Campaign ID".to_string(),
        });
        axis_titles.push(AxisTitle {
            cell,
            axis: Axis::Y,
            text: metric.capitalized(),
        });
    }

    Figure {
        layout: Layout {
            title: Some(TITLE.to_string()),
            width: Some(1200),
            height: Some(500),
            grid: GridSpec {
                rows: 1,
                cols: metrics.len(),
                shared_x: false,
                shared_y: false,
                horizontal_spacing: 0.2 / metrics.len().max(1) as f64,
                vertical_spacing: 0.0,
                subplot_titles: metrics.iter().map(|m| format!("{} per Campaign", m.capitalized())).collect(),
            },
            axis_titles,
            bar_mode: Some(BarMode::Stack),
            show_legend: true,
            legend_title: Some("Gender".to_string()),
            margin: Some(Margin {
                top: 60,
                left: 40,
                right: 20,
                bottom: 40,
            }),
        },
        traces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::by_campaign_gender;
    use crate::domain::{AdRecord, CampaignId, STACKED_METRICS};

    fn record(campaign: &str, gender: Gender, clicks: u64) -> AdRecord {
        AdRecord {
            campaign_id: CampaignId::new(campaign),
            gender,
            impressions: Some(1000),
            clicks: Some(clicks),
            spent: Some(clicks as f64 * 2.0),
            total_conversion: Some(1),
            approved_conversion: Some(1),
        }
    }

    fn figure() -> Figure {
        let records = vec![
            record("936", Gender::M, 10),
            record("1178", Gender::F, 4),
            record("1178", Gender::M, 7),
            record("936", Gender::M, 5),
        ];
        stacked_comparison(&by_campaign_gender(&records), &STACKED_METRICS)
    }

    #[test]
    fn one_panel_per_metric_two_series_each() {
        let fig = figure();
        assert_eq!(fig.layout.grid.cols, 3);
        assert_eq!(fig.traces.len(), 6);
        assert_eq!(fig.layout.bar_mode, Some(BarMode::Stack));
        assert_eq!(
            fig.layout.grid.subplot_titles,
            vec!["Spent per Campaign", "Clicks per Campaign", "Total_conversion per Campaign"]
        );
    }

    #[test]
    fn legend_only_on_first_panel() {
        let fig = figure();
        let legend: Vec<&str> = fig.traces.iter().filter(|t| t.show_legend()).map(|t| t.name()).collect();
        assert_eq!(legend, vec!["M - spent", "F - spent"]);
    }

    #[test]
    fn bars_hold_per_campaign_sums() {
        let fig = figure();
        let Trace::Bar(m_clicks) = &fig.traces[2] else { panic!("bar expected") };
        assert_eq!(m_clicks.name, "M - clicks");
        assert_eq!(m_clicks.x, vec!["1178", "936"]);
        assert_eq!(m_clicks.y, vec![7.0, 15.0]);

        let Trace::Bar(f_clicks) = &fig.traces[3] else { panic!("bar expected") };
        assert_eq!(f_clicks.x, vec!["1178"]);
        assert_eq!(f_clicks.color, "pink");
    }

    #[test]
    fn gender_colours_are_stable() {
        let fig = figure();
        for t in &fig.traces {
            let expected = if t.name().starts_with('M') { "lightblue" } else { "pink" };
            assert_eq!(t.color(), expected);
        }
    }
}
