//! Plotters-powered figure panel widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - rectangles and paths for bars and boxes, not just points and lines
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::charts::palette::css_to_rgb;
use crate::charts::{BarMode, Cell, Figure, Trace};
use crate::stats::box_summary;

/// Half-width of a bar or box, in category units.
const HALF_WIDTH: f64 = 0.35;

/// Data bounds of one subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelExtent {
    pub x: [f64; 2],
    pub y: [f64; 2],
    /// Category labels for bar and box panels (index = x position).
    pub categories: Vec<String>,
}

/// Compute the bounds of `cell`. `None` when the cell holds nothing drawable.
pub fn panel_extent(figure: &Figure, cell: Cell) -> Option<PanelExtent> {
    let traces: Vec<&Trace> = figure.traces_in(cell).collect();
    let first = traces.first()?;

    let (x, y, categories) = match first {
        Trace::Scatter(_) => {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for t in &traces {
                if let Trace::Scatter(s) = t {
                    xs.extend(s.x.iter().copied().filter(|v| v.is_finite()));
                    ys.extend(s.y.iter().copied().filter(|v| v.is_finite()));
                }
            }
            (padded(bounds(&xs)?), padded(bounds(&ys)?), Vec::new())
        }
        Trace::Bar(_) => {
            let mut categories: Vec<String> = Vec::new();
            for t in &traces {
                if let Trace::Bar(b) = t {
                    for c in &b.x {
                        if !categories.contains(c) {
                            categories.push(c.clone());
                        }
                    }
                }
            }
            let stacked = figure.layout.bar_mode == Some(BarMode::Stack);
            let top = categories
                .iter()
                .map(|c| {
                    let values = traces.iter().filter_map(|t| match t {
                        Trace::Bar(b) => Some(bar_value(&b.x, &b.y, c)),
                        _ => None,
                    });
                    if stacked { values.sum::<f64>() } else { values.fold(0.0, f64::max) }
                })
                .fold(0.0, f64::max);
            let top = if top > 0.0 { top * 1.05 } else { 1.0 };
            (category_span(categories.len())?, [0.0, top], categories)
        }
        Trace::Box(_) => {
            let mut categories = Vec::new();
            let mut ys = Vec::new();
            for t in &traces {
                if let Trace::Box(b) = t {
                    categories.push(b.name.clone());
                    ys.extend(b.y.iter().copied().filter(|v| v.is_finite()));
                }
            }
            (category_span(categories.len())?, padded(bounds(&ys)?), categories)
        }
    };

    Some(PanelExtent { x, y, categories })
}

fn bar_value(x: &[String], y: &[f64], category: &str) -> f64 {
    x.iter()
        .zip(y)
        .filter(|(c, _)| c.as_str() == category)
        .map(|(_, v)| v.max(0.0))
        .sum()
}

fn category_span(n: usize) -> Option<[f64; 2]> {
    (n > 0).then(|| [-0.5, n as f64 - 0.5])
}

fn bounds(values: &[f64]) -> Option<[f64; 2]> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if max > min { Some([min, max]) } else { Some([min - 0.5, max + 0.5]) }
}

fn padded([lo, hi]: [f64; 2]) -> [f64; 2] {
    let pad = ((hi - lo).abs() * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}

/// Plotters colour for a CSS colour string (white when unknown).
pub fn plotters_color(css: &str) -> RGBColor {
    css_to_rgb(css).map(|(r, g, b)| RGBColor(r, g, b)).unwrap_or(WHITE)
}

/// Ratatui colour for a CSS colour string, for legends drawn outside the chart.
pub fn ratatui_color(css: &str) -> Color {
    css_to_rgb(css).map(|(r, g, b)| Color::Rgb(r, g, b)).unwrap_or(Color::White)
}

/// One subplot of a figure, drawn with Plotters.
pub struct FigurePanel<'a> {
    pub figure: &'a Figure,
    pub cell: Cell,
    pub x_label: String,
    pub y_label: String,
}

impl<'a> Widget for FigurePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let Some(extent) = panel_extent(self.figure, self.cell) else {
            buf.set_string(area.x, area.y, "No data in this panel.", Style::default().fg(Color::Yellow));
            return;
        };

        let [x0, x1] = extent.x;
        let [y0, y1] = extent.y;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let figure = self.figure;
        let cell = self.cell;
        let stacked = figure.layout.bar_mode == Some(BarMode::Stack);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let categories = &extent.categories;
            let fmt_x = |v: &f64| -> String {
                if categories.is_empty() {
                    return fmt_tick(*v);
                }
                let idx = v.round();
                if (v - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                categories.get(idx as usize).cloned().unwrap_or_default()
            };
            let fmt_y = |v: &f64| fmt_tick(*v);

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .x_labels(if categories.is_empty() { 5 } else { categories.len() + 1 })
                .y_labels(5)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&fmt_y)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Running bar tops per category when stacking.
            let mut base = vec![0.0_f64; categories.len()];
            let bar_traces = figure
                .traces_in(cell)
                .filter(|t| matches!(t, Trace::Bar(_)))
                .count()
                .max(1);
            let mut bar_index = 0usize;
            let mut box_index = 0usize;

            for trace in figure.traces_in(cell) {
                let color = plotters_color(trace.color());
                match trace {
                    // We avoid `Circle` markers: the backend maps circle radii
                    // incorrectly and draws huge circles. A coloured `Pixel` is a clean dot.
                    Trace::Scatter(s) => {
                        chart.draw_series(
                            s.x.iter()
                                .zip(&s.y)
                                .filter(|(x, y)| x.is_finite() && y.is_finite())
                                .map(|(&x, &y)| Pixel::new((x, y), color)),
                        )?;
                    }
                    Trace::Bar(b) => {
                        let mut rects = Vec::new();
                        for (i, category) in categories.iter().enumerate() {
                            let v = bar_value(&b.x, &b.y, category);
                            if v <= 0.0 {
                                continue;
                            }
                            let centre = i as f64;
                            let (left, right, bottom) = if stacked {
                                (centre - HALF_WIDTH, centre + HALF_WIDTH, base[i])
                            } else {
                                let w = 2.0 * HALF_WIDTH / bar_traces as f64;
                                let left = centre - HALF_WIDTH + w * bar_index as f64;
                                (left, left + w, 0.0)
                            };
                            if stacked {
                                base[i] += v;
                            }
                            rects.push(Rectangle::new([(left, bottom), (right, bottom + v)], ShapeStyle::from(&color).filled()));
                        }
                        chart.draw_series(rects)?;
                        bar_index += 1;
                    }
                    Trace::Box(b) => {
                        let x = box_index as f64;
                        box_index += 1;
                        let Some(s) = b.summary.or_else(|| box_summary(&b.y)) else {
                            continue;
                        };
                        let style = ShapeStyle::from(&color);
                        chart.draw_series([
                            PathElement::new(vec![(x, s.lower_whisker), (x, s.q1)], style),
                            PathElement::new(vec![(x, s.q3), (x, s.upper_whisker)], style),
                            PathElement::new(vec![(x - HALF_WIDTH, s.median), (x + HALF_WIDTH, s.median)], style),
                        ])?;
                        chart.draw_series(std::iter::once(Rectangle::new(
                            [(x - HALF_WIDTH, s.q1), (x + HALF_WIDTH, s.q3)],
                            style,
                        )))?;
                        chart.draw_series(
                            b.y.iter()
                                .filter(|v| v.is_finite() && (**v < s.lower_whisker || **v > s.upper_whisker))
                                .map(|&v| Pixel::new((x, v), color)),
                        )?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else if a >= 1.0 || a == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BarTrace, BoxTrace, GridSpec, Layout};

    fn figure(bar_mode: Option<BarMode>, traces: Vec<Trace>) -> Figure {
        Figure {
            layout: Layout {
                title: None,
                width: None,
                height: None,
                grid: GridSpec::single(),
                axis_titles: Vec::new(),
                bar_mode,
                show_legend: true,
                legend_title: None,
                margin: None,
            },
            traces,
        }
    }

    fn bar(name: &str, x: &[&str], y: Vec<f64>) -> Trace {
        Trace::Bar(BarTrace {
            name: name.to_string(),
            cell: Cell::ORIGIN,
            x: x.iter().map(|s| s.to_string()).collect(),
            y,
            color: "pink".to_string(),
            show_legend: true,
        })
    }

    #[test]
    fn stacked_extent_reaches_the_tallest_stack() {
        let fig = figure(
            Some(BarMode::Stack),
            vec![bar("M", &["1178", "936"], vec![10.0, 4.0]), bar("F", &["1178"], vec![10.0])],
        );
        let extent = panel_extent(&fig, Cell::ORIGIN).unwrap();
        assert_eq!(extent.categories, vec!["1178", "936"]);
        assert_eq!(extent.x, [-0.5, 1.5]);
        assert!((extent.y[1] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn box_extent_uses_trace_names_as_categories() {
        let fig = figure(
            None,
            vec![Trace::Box(BoxTrace {
                name: "M".to_string(),
                cell: Cell::ORIGIN,
                y: vec![0.0, 1.0],
                color: "lightblue".to_string(),
                show_legend: false,
                summary: None,
            })],
        );
        let extent = panel_extent(&fig, Cell::ORIGIN).unwrap();
        assert_eq!(extent.categories, vec!["M"]);
        assert!(extent.y[0] < 0.0 && extent.y[1] > 1.0);
    }

    #[test]
    fn empty_cell_has_no_extent() {
        let fig = figure(None, Vec::new());
        assert!(panel_extent(&fig, Cell::ORIGIN).is_none());
    }

    #[test]
    fn colours_convert_for_both_backends() {
        assert_eq!(plotters_color("#636EFA"), RGBColor(0x63, 0x6E, 0xFA));
        assert_eq!(ratatui_color("lightblue"), Color::Rgb(0xAD, 0xD8, 0xE6));
        assert_eq!(ratatui_color("nonsense"), Color::White);
    }

    #[test]
    fn tick_labels_stay_short() {
        assert_eq!(fmt_tick(1_500_000.0), "1.5M");
        assert_eq!(fmt_tick(2_500.0), "2.5k");
        assert_eq!(fmt_tick(0.00021), "0.0002");
    }
}
