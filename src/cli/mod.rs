//! Command-line parsing for the gender A/B dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis and chart code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "abdash", version, about = "Ad campaign A/B results by gender")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the dashboard, print it, and optionally export JSON/HTML/CSV.
    Report(ReportArgs),
    /// Browse the dashboard in an interactive terminal UI.
    ///
    /// This uses the same underlying pipeline as `abdash report`, but draws the
    /// figures with Plotters inside a Ratatui interface.
    Tui(DataArgs),
    /// Write a synthetic advertising dataset.
    Sample(SampleArgs),
}

/// Input and analysis options shared by `report` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Input CSV (defaults to ABDASH_DATA, then `data.csv`).
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Campaign id for the pairwise grid (repeatable; defaults to 1178, 936, 916).
    #[arg(short = 'c', long = "campaign", value_name = "ID")]
    pub campaigns: Vec<String>,

    /// Also run Shapiro-Wilk and Mann-Whitney U on the loaded rows.
    #[arg(long)]
    pub recompute_stats: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Disable the ASCII figure sketches.
    #[arg(long)]
    pub no_plot: bool,

    /// Sketch width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Sketch height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Export the dashboard (blocks + figures) to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Export a standalone HTML page.
    #[arg(long = "export-html", value_name = "PATH")]
    pub export_html: Option<PathBuf>,

    /// Export the campaign × gender summary to CSV.
    #[arg(long = "export-summary", value_name = "PATH")]
    pub export_summary: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(short = 'n', long, default_value_t = crate::data::DEFAULT_ROWS)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = crate::data::DEFAULT_SEED)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_parse() {
        let cli = Cli::parse_from([
            "abdash",
            "report",
            "--data",
            "ads.csv",
            "-c",
            "1178",
            "--campaign",
            "916",
            "--recompute-stats",
            "--export-html",
            "out.html",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("report expected");
        };
        assert_eq!(args.data.data, Some(PathBuf::from("ads.csv")));
        assert_eq!(args.data.campaigns, vec!["1178", "916"]);
        assert!(args.data.recompute_stats);
        assert_eq!(args.export_html, Some(PathBuf::from("out.html")));
        assert_eq!(args.width, 60);
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::parse_from(["abdash", "sample", "--out", "data.csv"]);
        let Command::Sample(args) = cli.command else {
            panic!("sample expected");
        };
        assert_eq!(args.rows, 1143);
        assert_eq!(args.seed, 42);
    }
}
