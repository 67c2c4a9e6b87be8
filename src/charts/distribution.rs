//! Box plots of a per-row ratio split by gender.

use serde::{Deserialize, Serialize};

use crate::analysis::DerivedRow;
use crate::charts::figure::{Axis, AxisTitle, BoxTrace, Cell, Figure, GridSpec, Layout, Trace};
use crate::charts::palette::gender_color;
use crate::domain::Gender;
use crate::stats::box_summary;

/// Per-row ratio plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ratio {
    Ctr,
    ConversionRate,
}

impl Ratio {
    pub fn label(self) -> &'static str {
        match self {
            Ratio::Ctr => "CTR",
            Ratio::ConversionRate => "Conversion Rate",
        }
    }

    fn value(self, row: &DerivedRow) -> Option<f64> {
        match self {
            Ratio::Ctr => row.ctr,
            Ratio::ConversionRate => row.conversion_rate,
        }
    }
}

/// One box per gender (M, then F); undefined ratios are skipped and a gender
/// without any defined value gets no box. Legends are suppressed.
pub fn distribution_by_gender(rows: &[DerivedRow], ratio: Ratio) -> Figure {
    let cell = Cell::ORIGIN;

    let traces = Gender::DISPLAY_ORDER
        .into_iter()
        .filter_map(|gender| {
            let y: Vec<f64> = rows
                .iter()
                .filter(|r| r.record.gender == gender)
                .filter_map(|r| ratio.value(r))
                .filter(|v| v.is_finite())
                .collect();
            if y.is_empty() {
                return None;
            }
            Some(Trace::Box(BoxTrace {
                name: gender.to_string(),
                cell,
                summary: box_summary(&y),
                y,
                color: gender_color(gender).to_string(),
                show_legend: false,
            }))
        })
        .collect();

    Figure {
        layout: Layout {
            title: None,
            width: None,
            height: None,
            grid: GridSpec::single(),
            axis_titles: vec![
                AxisTitle {
                    cell,
                    axis: Axis::X,
                    text: "gender".to_string(),
                },
                AxisTitle {
                    cell,
                    axis: Axis::Y,
                    text: ratio.label().to_string(),
                },
            ],
            bar_mode: None,
            show_legend: false,
            legend_title: None,
            margin: None,
        },
        traces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_ratios;
    use crate::domain::{AdRecord, CampaignId};

    fn record(gender: Gender, impressions: u64, clicks: u64, approved: u64) -> AdRecord {
        AdRecord {
            campaign_id: CampaignId::new("916"),
            gender,
            impressions: Some(impressions),
            clicks: Some(clicks),
            spent: Some(1.0),
            total_conversion: Some(approved),
            approved_conversion: Some(approved),
        }
    }

    #[test]
    fn one_box_per_gender_with_fixed_colours() {
        let rows = derive_ratios(&[
            record(Gender::F, 100, 2, 1),
            record(Gender::M, 100, 1, 0),
            record(Gender::M, 0, 0, 0),
        ]);
        let fig = distribution_by_gender(&rows, Ratio::Ctr);

        let names: Vec<&str> = fig.traces.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["M", "F"]);
        assert_eq!(fig.traces[0].color(), "lightblue");
        assert_eq!(fig.traces[1].color(), "pink");
        assert!(!fig.layout.show_legend);
        assert!(fig.traces.iter().all(|t| !t.show_legend()));

        // The zero-impression row has no CTR and is left out.
        let Trace::Box(m) = &fig.traces[0] else { panic!("box expected") };
        assert_eq!(m.y, vec![0.01]);
        assert_eq!(m.summary.map(|s| s.n), Some(1));
    }

    #[test]
    fn conversion_rate_uses_guarded_ratio() {
        let rows = derive_ratios(&[record(Gender::F, 100, 0, 2)]);
        let fig = distribution_by_gender(&rows, Ratio::ConversionRate);
        let Trace::Box(f) = &fig.traces[0] else { panic!("box expected") };
        assert_eq!(f.y, vec![2.0]);
        assert_eq!(fig.axis_title(Cell::ORIGIN, Axis::Y), Some("Conversion Rate"));
    }
}
