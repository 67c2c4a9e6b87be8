//! ASCII/Unicode sketches of figures for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid per panel), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each populated subplot becomes one panel:
//! - scatter: one glyph per colour on a character grid
//! - bar: horizontal bars per category, stacked or side by side
//! - box: horizontal whisker/box strips on a shared scale

use crate::charts::{BarMode, BarTrace, BoxTrace, Cell, Figure, ScatterTrace, Trace};
use crate::stats::box_summary;

const GLYPHS: [char; 8] = ['o', 'x', '+', '*', '#', '@', '%', '&'];

/// Render every populated panel of `figure`, each at roughly `width` × `height`.
pub fn render_figure(figure: &Figure, width: usize, height: usize) -> String {
    let glyphs = GlyphMap::for_figure(figure);
    let mut out = String::new();

    if let Some(title) = &figure.layout.title {
        out.push_str(&format!("Figure: {title}\n"));
    }

    for cell in figure.populated_cells() {
        let label = figure.cell_label(cell);
        out.push_str(&format!("[{},{}] {label}", cell.row + 1, cell.col + 1).trim_end().to_string());
        out.push('\n');

        let traces: Vec<&Trace> = figure.traces_in(cell).collect();
        let scatter: Vec<&ScatterTrace> = traces
            .iter()
            .filter_map(|t| match t {
                Trace::Scatter(s) => Some(s),
                _ => None,
            })
            .collect();
        let bars: Vec<&BarTrace> = traces
            .iter()
            .filter_map(|t| match t {
                Trace::Bar(b) => Some(b),
                _ => None,
            })
            .collect();
        let boxes: Vec<&BoxTrace> = traces
            .iter()
            .filter_map(|t| match t {
                Trace::Box(b) => Some(b),
                _ => None,
            })
            .collect();

        if !scatter.is_empty() {
            out.push_str(&render_scatter_panel(&scatter, &glyphs, width, height));
        }
        if !bars.is_empty() {
            let mode = figure.layout.bar_mode.unwrap_or(BarMode::Group);
            out.push_str(&render_bar_panel(&bars, &glyphs, mode, width));
        }
        if !boxes.is_empty() {
            out.push_str(&render_box_panel(&boxes, width));
        }
    }

    let legend = glyphs.legend(figure);
    if !legend.is_empty() {
        out.push_str(&format!("Legend: {legend}\n"));
    }

    out
}

/// Glyph per trace colour, assigned in trace order.
struct GlyphMap {
    entries: Vec<(String, char)>,
}

impl GlyphMap {
    fn for_figure(figure: &Figure) -> Self {
        let mut entries: Vec<(String, char)> = Vec::new();
        for t in &figure.traces {
            if !entries.iter().any(|(c, _)| c == t.color()) {
                let glyph = GLYPHS[entries.len() % GLYPHS.len()];
                entries.push((t.color().to_string(), glyph));
            }
        }
        Self { entries }
    }

    fn glyph(&self, color: &str) -> char {
        self.entries
            .iter()
            .find(|(c, _)| c == color)
            .map(|(_, g)| *g)
            .unwrap_or(GLYPHS[0])
    }

    /// `o=1178  x=936` from the traces that carry legend entries.
    fn legend(&self, figure: &Figure) -> String {
        if !figure.layout.show_legend {
            return String::new();
        }
        figure
            .traces
            .iter()
            .filter(|t| t.show_legend())
            .map(|t| format!("{}={}", self.glyph(t.color()), t.name()))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn render_scatter_panel(traces: &[&ScatterTrace], glyphs: &GlyphMap, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let xs = traces.iter().flat_map(|t| t.x.iter().copied());
    let ys = traces.iter().flat_map(|t| t.y.iter().copied());
    let (x_min, x_max) = value_range(xs).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = value_range(ys).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for t in traces {
        let ch = glyphs.glyph(&t.marker.color);
        for (&x, &y) in t.x.iter().zip(&t.y) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn render_bar_panel(traces: &[&BarTrace], glyphs: &GlyphMap, mode: BarMode, width: usize) -> String {
    let width = width.max(10);

    let mut categories: Vec<&str> = Vec::new();
    for t in traces {
        for c in &t.x {
            if !categories.contains(&c.as_str()) {
                categories.push(c);
            }
        }
    }
    let label_w = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);

    let longest = match mode {
        BarMode::Stack => categories
            .iter()
            .map(|c| traces.iter().map(|t| bar_value(t, c)).sum::<f64>())
            .fold(0.0, f64::max),
        BarMode::Group => categories
            .iter()
            .flat_map(|c| traces.iter().map(move |t| (t, c)))
            .map(|(t, c)| bar_value(t, c))
            .fold(0.0, f64::max),
    };
    let scale = if longest > 0.0 { width as f64 / longest } else { 0.0 };
    let segment = |v: f64, ch: char| -> String { std::iter::repeat_n(ch, (v * scale).round() as usize).collect() };

    let mut out = String::new();
    for category in &categories {
        match mode {
            BarMode::Stack => {
                let mut bar = String::new();
                let mut total = 0.0;
                for t in traces {
                    let v = bar_value(t, category);
                    bar.push_str(&segment(v, glyphs.glyph(&t.color)));
                    total += v;
                }
                out.push_str(&format!("{category:<label_w$} |{bar} {}\n", fmt_value(total)));
            }
            BarMode::Group => {
                for (k, t) in traces.iter().enumerate() {
                    let v = bar_value(t, category);
                    let label = if k == 0 { *category } else { "" };
                    out.push_str(&format!(
                        "{label:<label_w$} |{} {}\n",
                        segment(v, glyphs.glyph(&t.color)),
                        fmt_value(v)
                    ));
                }
            }
        }
    }
    out
}

/// Sum of a trace's (non-negative) values for one category.
fn bar_value(t: &BarTrace, category: &str) -> f64 {
    t.x.iter()
        .zip(&t.y)
        .filter(|(c, _)| c.as_str() == category)
        .map(|(_, v)| v.max(0.0))
        .sum()
}

fn render_box_panel(traces: &[&BoxTrace], width: usize) -> String {
    let width = width.max(10);

    let summaries: Vec<_> = traces
        .iter()
        .map(|t| t.summary.or_else(|| box_summary(&t.y)))
        .collect();

    let extremes = summaries.iter().flatten().flat_map(|s| [s.min, s.max]);
    let (lo, hi) = value_range(extremes).unwrap_or((0.0, 1.0));

    let name_w = traces.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("y=[{lo:.4}, {hi:.4}]\n"));
    for (t, summary) in traces.iter().zip(&summaries) {
        let Some(s) = summary else {
            out.push_str(&format!("{:<name_w$} |\n", t.name));
            continue;
        };

        let mut strip = vec![' '; width];
        let at = |v: f64| map_x(v, lo, hi, width);
        for x in at(s.lower_whisker)..=at(s.upper_whisker) {
            strip[x] = '-';
        }
        for x in at(s.q1)..=at(s.q3) {
            strip[x] = '=';
        }
        strip[at(s.q1)] = '[';
        strip[at(s.q3)] = ']';
        strip[at(s.median)] = '|';
        if s.min < s.lower_whisker {
            strip[at(s.min)] = 'o';
        }
        if s.max > s.upper_whisker {
            strip[at(s.max)] = 'o';
        }

        let strip: String = strip.into_iter().collect();
        out.push_str(&format!(
            "{:<name_w$} |{} median={:.4} n={}\n",
            t.name,
            strip.trim_end(),
            s.median,
            s.n
        ));
    }
    out
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 0.5, max + 0.5)) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}
