//! Declarative figure model.
//!
//! A `Figure` says *what* to draw (grid of subplots, traces, titles, legend
//! policy) and nothing about *how*. The terminal sketcher, the HTML page and
//! the TUI each turn the same description into their own drawing calls, and
//! tests can inspect a figure without any renderer.

use serde::{Deserialize, Serialize};

use crate::stats::BoxSummary;

/// Zero-based subplot position (row 0 is the top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Title attached to one axis of one subplot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub cell: Cell,
    pub axis: Axis,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Subplot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub shared_x: bool,
    pub shared_y: bool,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    /// One entry per column of a single-row grid (empty when untitled).
    pub subplot_titles: Vec<String>,
}

impl GridSpec {
    /// A single plot.
    pub fn single() -> Self {
        Self {
            rows: 1,
            cols: 1,
            shared_x: false,
            shared_y: false,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            subplot_titles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub grid: GridSpec,
    pub axis_titles: Vec<AxisTitle>,
    pub bar_mode: Option<BarMode>,
    pub show_legend: bool,
    pub legend_title: Option<String>,
    pub margin: Option<Margin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
    pub opacity: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub cell: Cell,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub marker: Marker,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: String,
    pub cell: Cell,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub color: String,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxTrace {
    pub name: String,
    pub cell: Cell,
    pub y: Vec<f64>,
    pub color: String,
    pub show_legend: bool,
    /// Precomputed geometry for back-ends that do not compute quartiles themselves.
    pub summary: Option<BoxSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Bar(BarTrace),
    Box(BoxTrace),
}

impl Trace {
    pub fn cell(&self) -> Cell {
        match self {
            Trace::Scatter(t) => t.cell,
            Trace::Bar(t) => t.cell,
            Trace::Box(t) => t.cell,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.name,
            Trace::Bar(t) => &t.name,
            Trace::Box(t) => &t.name,
        }
    }

    pub fn show_legend(&self) -> bool {
        match self {
            Trace::Scatter(t) => t.show_legend,
            Trace::Bar(t) => t.show_legend,
            Trace::Box(t) => t.show_legend,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.marker.color,
            Trace::Bar(t) => &t.color,
            Trace::Box(t) => &t.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub layout: Layout,
    pub traces: Vec<Trace>,
}

impl Figure {
    /// Distinct cells holding at least one trace, in row-major order.
    pub fn populated_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.traces.iter().map(Trace::cell).collect();
        cells.sort();
        cells.dedup();
        cells
    }

    pub fn traces_in(&self, cell: Cell) -> impl Iterator<Item = &Trace> + '_ {
        self.traces.iter().filter(move |t| t.cell() == cell)
    }

    pub fn axis_title(&self, cell: Cell, axis: Axis) -> Option<&str> {
        self.layout
            .axis_titles
            .iter()
            .find(|t| t.cell == cell && t.axis == axis)
            .map(|t| t.text.as_str())
    }

    /// Subplot title when there is one, otherwise `y vs x` from the nearest
    /// edge axis titles (inner cells of a shared grid carry none of their own).
    pub fn cell_label(&self, cell: Cell) -> String {
        let grid = &self.layout.grid;
        if grid.rows == 1 {
            if let Some(title) = grid.subplot_titles.get(cell.col) {
                return title.clone();
            }
        }

        let y = self
            .axis_title(cell, Axis::Y)
            .or_else(|| self.axis_title(Cell::new(cell.row, 0), Axis::Y));
        let x = self
            .axis_title(cell, Axis::X)
            .or_else(|| self.axis_title(Cell::new(grid.rows.saturating_sub(1), cell.col), Axis::X));

        match (y, x) {
            (Some(y), Some(x)) => format!("{y} vs {x}"),
            (Some(y), None) => y.to_string(),
            (None, Some(x)) => x.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_figure(axis_titles: Vec<AxisTitle>) -> Figure {
        Figure {
            layout: Layout {
                title: None,
                width: None,
                height: None,
                grid: GridSpec {
                    rows: 3,
                    cols: 3,
                    ..GridSpec::single()
                },
                axis_titles,
                bar_mode: None,
                show_legend: false,
                legend_title: None,
                margin: None,
            },
            traces: Vec::new(),
        }
    }

    #[test]
    fn inner_cells_borrow_edge_axis_titles() {
        let fig = grid_figure(vec![
            AxisTitle {
                cell: Cell::new(2, 1),
                axis: Axis::X,
                text: "clicks".to_string(),
            },
            AxisTitle {
                cell: Cell::new(1, 0),
                axis: Axis::Y,
                text: "clicks".to_string(),
            },
            AxisTitle {
                cell: Cell::new(2, 0),
                axis: Axis::Y,
                text: "spent".to_string(),
            },
        ]);
        assert_eq!(fig.cell_label(Cell::new(2, 1)), "spent vs clicks");
        assert_eq!(fig.cell_label(Cell::new(1, 0)), "clicks");
    }

    #[test]
    fn single_row_uses_subplot_titles() {
        let mut fig = grid_figure(Vec::new());
        fig.layout.grid.rows = 1;
        fig.layout.grid.subplot_titles = vec!["Spent per Campaign".to_string()];
        assert_eq!(fig.cell_label(Cell::ORIGIN), "Spent per Campaign");
    }
}
