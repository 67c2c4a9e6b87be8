//! HTML dashboard generation.
//!
//! Produces one self-contained page: inline CSS, the dashboard blocks as
//! HTML, and every figure embedded as Plotly JSON. Plotly itself is loaded
//! from its CDN and draws the figures client-side.

use serde_json::{Map, Value, json};

use crate::charts::{Axis, Cell, Figure, Trace};
use crate::error::AppError;
use crate::report::{Block, CampaignSummaryRow, Dashboard, MetricCallout};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Render the dashboard as a standalone HTML page.
pub fn render_page(dashboard: &Dashboard) -> Result<String, AppError> {
    let mut figures: Vec<Value> = Vec::new();
    let mut body = String::new();
    for block in &dashboard.blocks {
        render_block(&mut body, block, &mut figures);
    }

    let figures_json = serde_json::to_string(&figures)
        .map_err(|e| AppError::new(4, format!("Failed to serialise figures: {e}")))?;

    let truncated = if dashboard.truncated { " (truncated)" } else { "" };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    <script src="{cdn}"></script>
</head>
<body>
    <div class="container">
        {body}
        <footer>Rows loaded: {rows}{truncated} | generated {generated}</footer>
    </div>
    <script>
const FIGURES = {figures};
FIGURES.forEach((fig, i) => {{
    Plotly.newPlot("figure-" + i, fig.data, fig.layout, {{responsive: true}});
}});
    </script>
</body>
</html>"#,
        title = html_escape(&page_title(dashboard)),
        css = inline_css(),
        cdn = PLOTLY_CDN,
        body = body,
        rows = dashboard.rows_loaded,
        truncated = truncated,
        generated = html_escape(&dashboard.generated_at),
        figures = script_safe(&figures_json),
    ))
}

fn page_title(dashboard: &Dashboard) -> String {
    dashboard
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Title { text } => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "Dashboard".to_string())
}

fn render_block(out: &mut String, block: &Block, figures: &mut Vec<Value>) {
    match block {
        Block::Title { text } => out.push_str(&format!("<h1>{}</h1>\n", html_escape(text))),
        Block::Subheader { text } => out.push_str(&format!("<h2>{}</h2>\n", html_escape(text))),
        Block::Markdown { text } => out.push_str(&markdown_to_html(text)),
        Block::Notice { text } => out.push_str(&format!("<div class=\"notice\">{}</div>\n", html_escape(text))),
        Block::Figure { figure } => {
            out.push_str(&format!("<div class=\"figure\" id=\"figure-{}\"></div>\n", figures.len()));
            figures.push(plotly_spec(figure));
        }
        Block::Columns { columns } => {
            out.push_str("<div class=\"columns\">\n");
            for column in columns {
                out.push_str("<div class=\"column\">\n");
                for b in column {
                    render_block(out, b, figures);
                }
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n");
        }
        Block::Metrics { items } => out.push_str(&render_metrics(items)),
        Block::CampaignSummary { rows } => out.push_str(&render_summary_table(rows)),
    }
}

fn render_metrics(items: &[MetricCallout]) -> String {
    let mut out = String::new();
    for m in items {
        out.push_str(&format!(
            "<div class=\"metric\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>\n",
            html_escape(&m.label),
            html_escape(&m.value)
        ));
    }
    out
}

fn render_summary_table(rows: &[CampaignSummaryRow]) -> String {
    let mut out = String::from(
        "<table>\n<thead><tr><th>campaign_id</th><th>gender</th><th>clicks</th><th>spent</th>\
         <th>approved_conversion</th><th>Conversion Rate</th></tr></thead>\n<tbody>\n",
    );
    for r in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.2}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{:.6}</td></tr>\n",
            html_escape(r.campaign_id.as_str()),
            r.gender,
            r.clicks,
            r.spent,
            r.approved_conversion,
            r.conversion_rate
        ));
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// Translate a figure into Plotly's `{data, layout}` JSON.
///
/// Subplot domains follow Plotly's `make_subplots`: equal cells separated by
/// the grid spacing, row 0 at the top, axis `k = row * cols + col + 1`.
pub fn plotly_spec(figure: &Figure) -> Value {
    let layout_in = &figure.layout;
    let grid = &layout_in.grid;
    let rows = grid.rows.max(1);
    let cols = grid.cols.max(1);

    let cell_w = (1.0 - grid.horizontal_spacing * (cols as f64 - 1.0)) / cols as f64;
    let cell_h = (1.0 - grid.vertical_spacing * (rows as f64 - 1.0)) / rows as f64;
    let x_domain = |col: usize| {
        let x0 = col as f64 * (cell_w + grid.horizontal_spacing);
        [x0, (x0 + cell_w).min(1.0)]
    };
    let y_domain = |row: usize| {
        let top = 1.0 - row as f64 * (cell_h + grid.vertical_spacing);
        [(top - cell_h).max(0.0), top]
    };

    let mut layout = Map::new();
    for row in 0..rows {
        for col in 0..cols {
            let k = axis_index(Cell::new(row, col), cols);
            let cell = Cell::new(row, col);

            let mut xaxis = Map::new();
            xaxis.insert("domain".into(), json!(x_domain(col)));
            xaxis.insert("anchor".into(), json!(axis_ref("y", k)));
            if grid.shared_x && row + 1 < rows {
                xaxis.insert("matches".into(), json!(axis_ref("x", axis_index(Cell::new(rows - 1, col), cols))));
                xaxis.insert("showticklabels".into(), json!(false));
            }
            if let Some(text) = figure.axis_title(cell, Axis::X) {
                xaxis.insert("title".into(), json!({ "text": text }));
            }

            let mut yaxis = Map::new();
            yaxis.insert("domain".into(), json!(y_domain(row)));
            yaxis.insert("anchor".into(), json!(axis_ref("x", k)));
            if grid.shared_y && col > 0 {
                yaxis.insert("matches".into(), json!(axis_ref("y", axis_index(Cell::new(row, 0), cols))));
                yaxis.insert("showticklabels".into(), json!(false));
            }
            if let Some(text) = figure.axis_title(cell, Axis::Y) {
                yaxis.insert("title".into(), json!({ "text": text }));
            }

            layout.insert(axis_ref("xaxis", k), Value::Object(xaxis));
            layout.insert(axis_ref("yaxis", k), Value::Object(yaxis));
        }
    }

    let annotations: Vec<Value> = grid
        .subplot_titles
        .iter()
        .enumerate()
        .take(cols)
        .map(|(col, text)| {
            let [x0, x1] = x_domain(col);
            json!({
                "text": text,
                "x": (x0 + x1) / 2.0,
                "y": y_domain(0)[1],
                "xref": "paper",
                "yref": "paper",
                "xanchor": "center",
                "yanchor": "bottom",
                "showarrow": false,
                "font": { "size": 16 },
            })
        })
        .collect();
    if !annotations.is_empty() {
        layout.insert("annotations".into(), Value::Array(annotations));
    }

    if let Some(title) = &layout_in.title {
        layout.insert("title".into(), json!({ "text": title }));
    }
    if let Some(width) = layout_in.width {
        layout.insert("width".into(), json!(width));
    }
    if let Some(height) = layout_in.height {
        layout.insert("height".into(), json!(height));
    }
    if let Some(mode) = layout_in.bar_mode {
        layout.insert("barmode".into(), json!(mode));
    }
    layout.insert("showlegend".into(), json!(layout_in.show_legend));
    if let Some(legend) = &layout_in.legend_title {
        layout.insert("legend".into(), json!({ "title": { "text": legend } }));
    }
    if let Some(m) = layout_in.margin {
        layout.insert("margin".into(), json!({ "t": m.top, "l": m.left, "r": m.right, "b": m.bottom }));
    }

    let data: Vec<Value> = figure.traces.iter().map(|t| plotly_trace(t, cols)).collect();

    json!({ "data": data, "layout": Value::Object(layout) })
}

fn plotly_trace(trace: &Trace, cols: usize) -> Value {
    let k = axis_index(trace.cell(), cols);
    let mut value = match trace {
        Trace::Scatter(t) => json!({
            "type": "scatter",
            "mode": "markers",
            "x": t.x,
            "y": t.y,
            "marker": { "color": t.marker.color, "opacity": t.marker.opacity, "size": t.marker.size },
        }),
        Trace::Bar(t) => json!({
            "type": "bar",
            "x": t.x,
            "y": t.y,
            "marker": { "color": t.color },
        }),
        Trace::Box(t) => json!({
            "type": "box",
            "y": t.y,
            "marker": { "color": t.color },
        }),
    };

    if let Value::Object(map) = &mut value {
        map.insert("name".into(), json!(trace.name()));
        // Same-named series across subplots toggle together from the legend.
        map.insert("legendgroup".into(), json!(trace.name()));
        map.insert("showlegend".into(), json!(trace.show_legend()));
        map.insert("xaxis".into(), json!(axis_ref("x", k)));
        map.insert("yaxis".into(), json!(axis_ref("y", k)));
    }
    value
}

fn axis_index(cell: Cell, cols: usize) -> usize {
    cell.row * cols + cell.col + 1
}

/// `x`, `x2`, `x3`, ... (also `xaxis`, `xaxis2`, ... for layout keys)
fn axis_ref(prefix: &str, k: usize) -> String {
    if k == 1 { prefix.to_string() } else { format!("{prefix}{k}") }
}

/// Small Markdown subset: headings (`####`), bullet and numbered lists, bold, paragraphs.
fn markdown_to_html(text: &str) -> String {
    #[derive(PartialEq)]
    enum List {
        None,
        Bullet,
        Numbered,
    }

    let mut out = String::new();
    let mut list = List::None;
    let close = |out: &mut String, list: &List| match list {
        List::Bullet => out.push_str("</ul>\n"),
        List::Numbered => out.push_str("</ol>\n"),
        List::None => {}
    };

    for line in text.lines() {
        let line = line.trim();
        let numbered = line
            .split_once(". ")
            .filter(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .map(|(_, rest)| rest);

        if let Some(item) = line.strip_prefix("- ") {
            if list != List::Bullet {
                close(&mut out, &list);
                out.push_str("<ul>\n");
                list = List::Bullet;
            }
            out.push_str(&format!("<li>{}</li>\n", inline_markdown(item)));
            continue;
        }
        if let Some(item) = numbered {
            if list != List::Numbered {
                close(&mut out, &list);
                out.push_str("<ol>\n");
                list = List::Numbered;
            }
            out.push_str(&format!("<li>{}</li>\n", inline_markdown(item)));
            continue;
        }

        close(&mut out, &list);
        list = List::None;

        if line.is_empty() {
            continue;
        }
        if let Some(heading) = line.strip_prefix("#### ") {
            out.push_str(&format!("<h4>{}</h4>\n", inline_markdown(heading)));
        } else {
            out.push_str(&format!("<p>{}</p>\n", inline_markdown(line)));
        }
    }
    close(&mut out, &list);
    out
}

/// Escape, then turn `**text**` into `<strong>text</strong>`.
fn inline_markdown(text: &str) -> String {
    let escaped = html_escape(text);
    let parts: Vec<&str> = escaped.split("**").collect();
    // An odd number of markers leaves the last one literal.
    if parts.len() % 2 == 0 {
        return escaped;
    }
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 1 {
            out.push_str(&format!("<strong>{part}</strong>"));
        } else {
            out.push_str(part);
        }
    }
    out
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #262730;
    background: #ffffff;
    margin: 0;
}
.container { max-width: 1280px; margin: 0 auto; padding: 2rem 1.5rem; }
h1 { font-size: 2rem; margin: 0 0 1rem; }
h2 { font-size: 1.5rem; margin: 2rem 0 0.75rem; }
h4 { font-size: 1.1rem; margin: 1.25rem 0 0.5rem; }
p { margin: 0.4rem 0; }
.notice {
    background: #fffce7;
    border-left: 4px solid #ffbd45;
    padding: 0.75rem 1rem;
    margin: 0.75rem 0;
}
.columns { display: flex; gap: 2rem; flex-wrap: wrap; }
.column { flex: 1 1 0; min-width: 320px; }
.metric { margin: 0.5rem 0 1rem; }
.metric-label { font-size: 0.9rem; color: #6b7280; }
.metric-value { font-size: 1.9rem; }
.figure { width: 100%; overflow-x: auto; }
table { border-collapse: collapse; margin: 0.75rem 0; font-size: 0.9rem; }
th, td { border: 1px solid #e5e7eb; padding: 0.35rem 0.75rem; text-align: left; }
th { background: #f9fafb; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
footer { margin-top: 3rem; font-size: 0.8rem; color: #9ca3af; }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BarMode, BarTrace, GridSpec, Layout, Marker, ScatterTrace};

    fn scatter_at(row: usize, col: usize, show_legend: bool) -> Trace {
        Trace::Scatter(ScatterTrace {
            name: "1178".to_string(),
            cell: Cell::new(row, col),
            x: vec![1.0, 2.0],
            y: vec![3.0, 4.0],
            marker: Marker {
                color: "#636EFA".to_string(),
                opacity: 0.5,
                size: 6.0,
            },
            show_legend,
        })
    }

    fn grid_figure() -> Figure {
        Figure {
            layout: Layout {
                title: Some("Grid".to_string()),
                width: Some(1200),
                height: Some(1200),
                grid: GridSpec {
                    rows: 2,
                    cols: 2,
                    shared_x: true,
                    shared_y: true,
                    horizontal_spacing: 0.0,
                    vertical_spacing: 0.0,
                    subplot_titles: Vec::new(),
                },
                axis_titles: Vec::new(),
                bar_mode: None,
                show_legend: true,
                legend_title: Some("Campaign ID".to_string()),
                margin: None,
            },
            traces: vec![scatter_at(1, 0, true), scatter_at(1, 1, false)],
        }
    }

    #[test]
    fn traces_anchor_to_their_cell_axes() {
        let spec = plotly_spec(&grid_figure());
        assert_eq!(spec["data"][0]["xaxis"], "x3");
        assert_eq!(spec["data"][0]["yaxis"], "y3");
        assert_eq!(spec["data"][1]["xaxis"], "x4");
        assert_eq!(spec["data"][0]["showlegend"], true);
        assert_eq!(spec["data"][1]["showlegend"], false);
        assert_eq!(spec["layout"]["legend"]["title"]["text"], "Campaign ID");
    }

    #[test]
    fn shared_axes_match_edge_axes() {
        let spec = plotly_spec(&grid_figure());
        let layout = &spec["layout"];
        // Top-left x follows the bottom-left x; bottom-right y follows bottom-left y.
        assert_eq!(layout["xaxis"]["matches"], "x3");
        assert_eq!(layout["yaxis4"]["matches"], "y3");
        assert!(layout["xaxis3"].get("matches").is_none());
        assert_eq!(layout["xaxis2"]["domain"], json!([0.5, 1.0]));
        assert_eq!(layout["yaxis"]["domain"], json!([0.5, 1.0]));
    }

    #[test]
    fn subplot_titles_become_annotations() {
        let fig = Figure {
            layout: Layout {
                title: None,
                width: None,
                height: None,
                grid: GridSpec {
                    subplot_titles: vec!["Spent per Campaign".to_string(), "Clicks per Campaign".to_string()],
                    cols: 2,
                    ..GridSpec::single()
                },
                axis_titles: Vec::new(),
                bar_mode: Some(BarMode::Stack),
                show_legend: true,
                legend_title: None,
                margin: None,
            },
            traces: vec![Trace::Bar(BarTrace {
                name: "M - spent".to_string(),
                cell: Cell::ORIGIN,
                x: vec!["1178".to_string()],
                y: vec![10.0],
                color: "lightblue".to_string(),
                show_legend: true,
            })],
        };
        let spec = plotly_spec(&fig);
        assert_eq!(spec["layout"]["barmode"], "stack");
        assert_eq!(spec["layout"]["annotations"][1]["text"], "Clicks per Campaign");
        assert_eq!(spec["data"][0]["marker"]["color"], "lightblue");
    }

    #[test]
    fn page_embeds_figure_json_and_escapes_text() {
        let dashboard = Dashboard {
            generated_at: "2025-01-01T00:00:00Z".to_string(),
            rows_loaded: 3,
            truncated: false,
            blocks: vec![
                Block::title("A <b> test"),
                Block::Figure { figure: grid_figure() },
                Block::markdown("**Hypotheses:**\n\n- one\n- two"),
            ],
            gender_summary: Vec::new(),
            campaign_summary: Vec::new(),
            published_stats: crate::stats::PUBLISHED,
            recomputed_stats: None,
        };

        let page = render_page(&dashboard).unwrap();
        assert!(page.contains("<title>A &lt;b&gt; test</title>"));
        assert!(page.contains("<div class=\"figure\" id=\"figure-0\"></div>"));
        assert!(page.contains("\"legendgroup\":\"1178\""));
        assert!(page.contains("<p><strong>Hypotheses:</strong></p>"));
        assert!(page.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
    }

    #[test]
    fn numbered_lists_and_headings() {
        let html = markdown_to_html("#### CTR Analysis\n\n1. first\n2. second");
        assert_eq!(html, "<h4>CTR Analysis</h4>\n<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n");
    }

    #[test]
    fn script_safe_breaks_closing_tags() {
        assert_eq!(script_safe("\"</script>\""), "\"<\\/script>\"");
    }
}
