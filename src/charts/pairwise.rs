//! Lower-triangle pairwise scatter grid.
//!
//! For N metrics the grid is N×N but only cells `(i, j)` with `j < i` are
//! populated: the diagonal would plot a metric against itself and the upper
//! triangle mirrors the lower one. That leaves `N (N - 1) / 2` cells.

use tracing::debug;

use crate::charts::figure::{Axis, AxisTitle, Cell, Figure, GridSpec, Layout, Margin, Marker, ScatterTrace, Trace};
use crate::charts::palette::CampaignPalette;
use crate::domain::{AdRecord, CampaignId, Metric};

pub const TITLE: &str = "Pairwise Metric Relationships by Campaign (Lower Triangle)";
pub const NO_DATA_NOTICE: &str = "No data available for the selected campaigns and metrics.";

const MARKER_OPACITY: f64 = 0.5;
const MARKER_SIZE: f64 = 6.0;
const SPACING: f64 = 0.01;

/// Result of building the grid: a figure, or a notice when there is nothing to plot.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    Figure(Figure),
    NoData,
}

/// Build the grid over `subset` (already filtered to complete rows of the target campaigns).
///
/// Each populated cell holds one series per campaign that has rows in the
/// subset, in `campaigns` order. Only the bottom-left cell emits legend
/// entries.
pub fn pairwise_grid(subset: &[&AdRecord], metrics: &[Metric], campaigns: &[CampaignId]) -> GridOutcome {
    if subset.is_empty() {
        debug!("pairwise subset is empty, skipping grid");
        return GridOutcome::NoData;
    }

    let n = metrics.len();
    let palette = CampaignPalette::for_campaigns(campaigns);
    let present: Vec<&CampaignId> = campaigns
        .iter()
        .filter(|id| subset.iter().any(|r| &r.campaign_id == *id))
        .collect();

    let mut traces = Vec::new();
    let mut axis_titles = Vec::new();

    for i in 0..n {
        for j in 0..i {
            let x_metric = metrics[j];
            let y_metric = metrics[i];
            let cell = Cell::new(i, j);
            let legend_cell = i == n - 1 && j == 0;

            for &campaign in &present {
                let (x, y): (Vec<f64>, Vec<f64>) = subset
                    .iter()
                    .filter(|r| &r.campaign_id == campaign)
                    .filter_map(|r| Some((x_metric.value(r)?, y_metric.value(r)?)))
                    .unzip();

                traces.push(Trace::Scatter(ScatterTrace {
                    name: campaign.to_string(),
                    cell,
                    x,
                    y,
                    marker: Marker {
                        color: palette.color(campaign).to_string(),
                        opacity: MARKER_OPACITY,
                        size: MARKER_SIZE,
                    },
                    show_legend: legend_cell,
                }));
            }

            // Axis titles only on the outer edge of the triangle.
            if j == 0 {
                axis_titles.push(AxisTitle {
                    cell,
                    axis: Axis::Y,
                    text: y_metric.column().to_string(),
                });
            }
            if i == n - 1 {
                axis_titles.push(AxisTitle {
                    cell,
                    axis: Axis::X,
                    text: x_metric.column().to_string(),
                });
            }
        }
    }

    debug!(cells = n * n.saturating_sub(1) / 2, traces = traces.len(), "pairwise grid built");

    GridOutcome::Figure(Figure {
        layout: Layout {
            title: Some(TITLE.to_string()),
            width: Some(1200),
            height: Some(1200),
            grid: GridSpec {
                rows: n,
                cols: n,
                shared_x: true,
                shared_y: true,
                horizontal_spacing: SPACING,
                vertical_spacing: SPACING,
                subplot_titles: Vec::new(),
            },
            axis_titles,
            bar_mode: None,
            show_legend: true,
            legend_title: Some("Campaign ID".to_string()),
            margin: Some(Margin {
                top: 80,
                left: 20,
                right: 20,
                bottom: 20,
            }),
        },
        traces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, PAIRWISE_METRICS, TARGET_CAMPAIGNS};

    fn record(campaign: &str, base: u64) -> AdRecord {
        AdRecord {
            campaign_id: CampaignId::new(campaign),
            gender: Gender::M,
            impressions: Some(base * 100),
            clicks: Some(base),
            spent: Some(base as f64 * 1.25),
            total_conversion: Some(base / 2 + 1),
            approved_conversion: Some(base / 4),
        }
    }

    fn targets() -> Vec<CampaignId> {
        TARGET_CAMPAIGNS.iter().map(|&id| CampaignId::new(id)).collect()
    }

    fn build(records: &[AdRecord]) -> Figure {
        let subset: Vec<&AdRecord> = records.iter().collect();
        match pairwise_grid(&subset, &PAIRWISE_METRICS, &targets()) {
            GridOutcome::Figure(fig) => fig,
            GridOutcome::NoData => panic!("expected a figure"),
        }
    }

    fn sample_records() -> Vec<AdRecord> {
        vec![record("1178", 10), record("936", 20), record("916", 30), record("1178", 40)]
    }

    #[test]
    fn five_metrics_fill_ten_lower_triangle_cells() {
        let fig = build(&sample_records());
        let cells = fig.populated_cells();
        assert_eq!(cells.len(), 10);
        assert!(cells.iter().all(|c| c.col < c.row));
        for cell in cells {
            assert_eq!(fig.traces_in(cell).count(), 3);
        }
    }

    #[test]
    fn only_present_campaigns_get_series() {
        let fig = build(&[record("936", 5), record("936", 6)]);
        assert_eq!(fig.traces.len(), 10);
        assert!(fig.traces.iter().all(|t| t.name() == "936" && t.color() == "#EF553B"));
    }

    #[test]
    fn legend_comes_from_the_bottom_left_cell_only() {
        let fig = build(&sample_records());
        let legend: Vec<&Trace> = fig.traces.iter().filter(|t| t.show_legend()).collect();
        assert_eq!(legend.len(), 3);
        assert!(legend.iter().all(|t| t.cell() == Cell::new(4, 0)));
        let names: Vec<&str> = legend.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["1178", "936", "916"]);
    }

    #[test]
    fn axis_titles_only_on_outer_edge() {
        let fig = build(&sample_records());
        assert!(fig.layout.axis_titles.iter().all(|t| match t.axis {
            Axis::Y => t.cell.col == 0,
            Axis::X => t.cell.row == 4,
        }));
        assert_eq!(fig.axis_title(Cell::new(1, 0), Axis::Y), Some("clicks"));
        assert_eq!(fig.axis_title(Cell::new(4, 3), Axis::X), Some("total_conversion"));
        assert_eq!(fig.axis_title(Cell::new(4, 0), Axis::Y), Some("approved_conversion"));
        assert_eq!(fig.axis_title(Cell::new(3, 1), Axis::X), None);
        // Four y titles (rows 1..=4) and four x titles (columns 0..=3).
        assert_eq!(fig.layout.axis_titles.len(), 8);
    }

    #[test]
    fn cell_series_pair_the_right_columns() {
        let fig = build(&[record("916", 8)]);
        let trace = fig.traces_in(Cell::new(2, 1)).next().unwrap();
        let Trace::Scatter(s) = trace else { panic!("scatter expected") };
        // x = clicks, y = spent
        assert_eq!(s.x, vec![8.0]);
        assert_eq!(s.y, vec![10.0]);
        assert_eq!(s.marker.opacity, 0.5);
    }

    #[test]
    fn empty_subset_yields_notice_not_figure() {
        assert_eq!(pairwise_grid(&[], &PAIRWISE_METRICS, &targets()), GridOutcome::NoData);
    }
}
