//! Ratatui-based terminal UI.
//!
//! The TUI lists every dashboard block on the left and shows the selected one
//! on the right: text as wrapped paragraphs, the summary as a table, and
//! figures drawn with Plotters one subplot at a time.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block as Pane, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::run_report;
use crate::charts::{Axis, Cell, Figure};
use crate::cli::DataArgs;
use crate::config::Settings;
use crate::domain::{ReportConfig, StatsMode};
use crate::error::AppError;
use crate::report::{Block, CampaignSummaryRow, Dashboard, MetricCallout};

mod plotters_chart;

use plotters_chart::{FigurePanel, ratatui_color};

/// Start the TUI.
pub fn run(args: &DataArgs, settings: &Settings) -> Result<(), AppError> {
    let data_path = args.data.clone().unwrap_or_else(|| settings.data_path.clone());
    let config = crate::app::report_config_from_args(args);

    // Load before touching the terminal so input errors print normally.
    let mut app = App::new(data_path, config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    data_path: PathBuf,
    config: ReportConfig,
    dashboard: Dashboard,
    /// Dashboard blocks with side-by-side columns flattened, in page order.
    items: Vec<Block>,
    selected: usize,
    /// Index into the selected figure's populated cells.
    panel: usize,
    status: String,
}

impl App {
    fn new(data_path: PathBuf, config: ReportConfig) -> Result<Self, AppError> {
        let dashboard = run_report(&data_path, &config)?;
        let items = flatten_blocks(&dashboard.blocks);
        Ok(Self {
            status: format!("Loaded {}", data_path.display()),
            data_path,
            config,
            dashboard,
            items,
            selected: 0,
            panel: 0,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.panel = 0;
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                    self.panel = 0;
                }
            }
            KeyCode::Left => self.step_panel(-1),
            KeyCode::Right => self.step_panel(1),
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('s') => {
                let previous = self.config.stats_mode;
                self.config.stats_mode = match previous {
                    StatsMode::Published => StatsMode::Recomputed,
                    StatsMode::Recomputed => StatsMode::Published,
                };
                if !self.reload() {
                    self.config.stats_mode = previous;
                }
            }
            _ => {}
        }
        false
    }

    fn step_panel(&mut self, delta: isize) {
        let Some(Block::Figure { figure }) = self.items.get(self.selected) else {
            return;
        };
        let n = figure.populated_cells().len();
        if n == 0 {
            return;
        }
        self.panel = (self.panel as isize + delta).rem_euclid(n as isize) as usize;
    }

    /// Rebuild from disk; failures keep the previous dashboard and are shown in the status line.
    fn reload(&mut self) -> bool {
        match run_report(&self.data_path, &self.config) {
            Ok(dashboard) => {
                self.items = flatten_blocks(&dashboard.blocks);
                self.dashboard = dashboard;
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
                self.panel = 0;
                self.status = format!("Reloaded ({} rows, stats: {})", self.dashboard.rows_loaded, self.stats_label());
                true
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
                false
            }
        }
    }

    fn stats_label(&self) -> &'static str {
        match self.config.stats_mode {
            StatsMode::Published => "published",
            StatsMode::Recomputed => "published + recomputed",
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let dashboard = &self.dashboard;
        let campaigns: Vec<&str> = self.config.target_campaigns.iter().map(|c| c.as_str()).collect();
        let truncated = if dashboard.truncated { " (truncated)" } else { "" };

        let lines = vec![
            Line::from(vec![
                Span::styled("abdash", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.data_path.display())),
            ]),
            Line::from(Span::styled(
                format!(
                    "rows: {}{truncated} | campaigns: {} | stats: {}",
                    dashboard.rows_loaded,
                    campaigns.join(", "),
                    self.stats_label(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Pane::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        self.draw_sections(frame, chunks[0]);
        self.draw_content(frame, chunks[1]);
    }

    fn draw_sections(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|b| {
                let style = match b {
                    Block::Title { .. } | Block::Subheader { .. } => Style::default().add_modifier(Modifier::BOLD),
                    Block::Notice { .. } => Style::default().fg(Color::Yellow),
                    Block::Figure { .. } => Style::default().fg(Color::Cyan),
                    _ => Style::default(),
                };
                ListItem::new(Line::from(Span::styled(b.label(), style)))
            })
            .collect();

        let list = List::new(items)
            .block(Pane::default().title("Sections").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_content(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(block) = self.items.get(self.selected) else {
            return;
        };

        match block {
            Block::Figure { figure } => self.draw_figure(frame, area, figure),
            Block::CampaignSummary { rows } => draw_summary_table(frame, area, rows),
            Block::Metrics { items } => draw_text(frame, area, "Key metrics", metric_lines(items), Color::Reset),
            Block::Notice { text } => draw_text(frame, area, "Notice", text_lines(text), Color::Yellow),
            Block::Title { text } | Block::Subheader { text } | Block::Markdown { text } => {
                draw_text(frame, area, "Text", text_lines(text), Color::Reset)
            }
            // Columns are flattened before display.
            Block::Columns { .. } => {}
        }
    }

    fn draw_figure(&self, frame: &mut ratatui::Frame<'_>, area: Rect, figure: &Figure) {
        let cells = figure.populated_cells();
        let Some(&cell) = cells.get(self.panel.min(cells.len().saturating_sub(1))) else {
            draw_text(frame, area, "Figure", vec![Line::from("Figure has no traces.")], Color::Yellow);
            return;
        };

        let title = format!(
            "{} | panel {}/{}: {}",
            figure.layout.title.as_deref().unwrap_or("Figure"),
            self.panel.min(cells.len() - 1) + 1,
            cells.len(),
            figure.cell_label(cell),
        );
        let block = Pane::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let (x_label, y_label) = axis_labels(figure, cell);
        frame.render_widget(
            FigurePanel {
                figure,
                cell,
                x_label,
                y_label,
            },
            chunks[0],
        );
        frame.render_widget(Paragraph::new(legend_line(figure, cell)), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ section  ←/→ panel  r reload  s toggle recomputed stats  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Pane::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Flatten side-by-side columns into page order.
fn flatten_blocks(blocks: &[Block]) -> Vec<Block> {
    let mut out = Vec::new();
    for b in blocks {
        match b {
            Block::Columns { columns } => {
                for column in columns {
                    out.extend(flatten_blocks(column));
                }
            }
            other => out.push(other.clone()),
        }
    }
    out
}

/// Axis titles for one panel, falling back to the figure's edge titles.
fn axis_labels(figure: &Figure, cell: Cell) -> (String, String) {
    let rows = figure.layout.grid.rows;
    let x = figure
        .axis_title(cell, Axis::X)
        .or_else(|| figure.axis_title(Cell::new(rows.saturating_sub(1), cell.col), Axis::X))
        .unwrap_or("");
    let y = figure
        .axis_title(cell, Axis::Y)
        .or_else(|| figure.axis_title(Cell::new(cell.row, 0), Axis::Y))
        .unwrap_or("");
    (x.to_string(), y.to_string())
}

/// Coloured swatches for the series drawn in `cell`.
fn legend_line(figure: &Figure, cell: Cell) -> Line<'static> {
    let mut spans = Vec::new();
    for t in figure.traces_in(cell) {
        spans.push(Span::styled("■ ", Style::default().fg(ratatui_color(t.color()))));
        spans.push(Span::raw(format!("{}  ", t.name())));
    }
    Line::from(spans)
}

fn text_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|l| Line::from(l.replace("**", ""))).collect()
}

fn metric_lines(items: &[MetricCallout]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::styled(format!("{:<24}", m.label), Style::default().fg(Color::Gray)),
                Span::styled(m.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect()
}

fn draw_text(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'static>>, color: Color) {
    let p = Paragraph::new(Text::from(lines))
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(Pane::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_summary_table(frame: &mut ratatui::Frame<'_>, area: Rect, rows: &[CampaignSummaryRow]) {
    let header = Row::new(["campaign_id", "gender", "clicks", "spent", "approved", "conv. rate"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new([
                r.campaign_id.to_string(),
                r.gender.to_string(),
                r.clicks.to_string(),
                format!("{:.2}", r.spent),
                r.approved_conversion.to_string(),
                format!("{:.4}", r.conversion_rate),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(Pane::default().title("Campaign summary").borders(Borders::ALL));
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_flatten_in_page_order() {
        let blocks = vec![
            Block::title("t"),
            Block::Columns {
                columns: vec![
                    vec![Block::subheader("left"), Block::markdown("a")],
                    vec![Block::subheader("right")],
                ],
            },
            Block::markdown("end"),
        ];
        let labels: Vec<String> = flatten_blocks(&blocks).iter().map(Block::label).collect();
        assert_eq!(labels, vec!["t", "left", "a", "right", "end"]);
    }

    #[test]
    fn text_lines_drop_bold_markers() {
        let lines = text_lines("**H₀:** none\nsecond");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "H₀: none");
    }
}
