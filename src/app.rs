//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads environment settings and installs logging
//! - runs the report pipeline
//! - prints the dashboard and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DataArgs, ReportArgs, SampleArgs};
use crate::config::Settings;
use crate::domain::{CampaignId, ReportConfig, RunConfig, StatsMode};
use crate::error::AppError;
use crate::report::format::PlotSize;

pub mod pipeline;

/// Entry point for the `abdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `abdash` and `abdash --data x.csv` to behave like `abdash report ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env();

    match cli.command {
        Command::Report(args) => {
            settings.init_logging();
            handle_report(&args, &settings)
        }
        // No stderr subscriber: log lines would tear the alternate screen.
        Command::Tui(args) => crate::tui::run(&args, &settings),
        Command::Sample(args) => {
            settings.init_logging();
            handle_sample(&args)
        }
    }
}

fn handle_report(args: &ReportArgs, settings: &Settings) -> Result<(), AppError> {
    let config = run_config_from_args(args, settings);
    let dashboard = pipeline::run_report(&config.data_path, &config.report)?;

    let plot = config.plot.then_some(PlotSize {
        width: config.plot_width,
        height: config.plot_height,
    });
    println!("{}", crate::report::format_dashboard(&dashboard, plot));

    // Optional exports.
    if let Some(path) = &config.export_json {
        crate::io::export::write_dashboard_json(path, &dashboard)?;
    }
    if let Some(path) = &config.export_html {
        crate::io::export::write_dashboard_html(path, &dashboard)?;
    }
    if let Some(path) = &config.export_summary {
        let rows = crate::report::campaign_summary_rows(&dashboard.campaign_summary);
        crate::io::export::write_summary_csv(path, &rows)?;
    }

    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let rows = crate::data::generate_sample(args.rows, args.seed)?;
    crate::data::write_sample_csv(&args.out, &rows)?;
    info!(rows = rows.len(), seed = args.seed, "sample generated");
    println!("Wrote {} rows to {}", rows.len(), args.out.display());
    Ok(())
}

/// Report configuration from the shared data flags.
pub fn report_config_from_args(args: &DataArgs) -> ReportConfig {
    let mut config = ReportConfig::default();
    if !args.campaigns.is_empty() {
        config.target_campaigns = args.campaigns.iter().map(|c| CampaignId::new(c.as_str())).collect();
    }
    if args.recompute_stats {
        config.stats_mode = StatsMode::Recomputed;
    }
    config
}

pub fn run_config_from_args(args: &ReportArgs, settings: &Settings) -> RunConfig {
    RunConfig {
        data_path: args.data.data.clone().unwrap_or_else(|| settings.data_path.clone()),
        report: report_config_from_args(&args.data),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        export_html: args.export_html.clone(),
        export_summary: args.export_summary.clone(),
    }
}

/// Rewrite argv so `abdash` defaults to `abdash report`.
///
/// Rules:
/// - `abdash`                      -> `abdash report`
/// - `abdash --data x.csv ...`     -> `abdash report --data x.csv ...`
/// - `abdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "tui" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_report() {
        assert_eq!(rewrite_args(args(&["abdash"])), args(&["abdash", "report"]));
        assert_eq!(
            rewrite_args(args(&["abdash", "--no-plot"])),
            args(&["abdash", "report", "--no-plot"])
        );
        assert_eq!(rewrite_args(args(&["abdash", "tui"])), args(&["abdash", "tui"]));
        assert_eq!(rewrite_args(args(&["abdash", "--help"])), args(&["abdash", "--help"]));
    }

    #[test]
    fn cli_overrides_environment() {
        let settings = Settings {
            data_path: PathBuf::from("env.csv"),
            log_filter: "warn".to_string(),
        };
        let cli = crate::cli::Cli::parse_from(args(&["abdash", "report", "-c", "936", "--no-plot"]));
        let Command::Report(report) = cli.command else {
            panic!("report expected");
        };

        let config = run_config_from_args(&report, &settings);
        assert_eq!(config.data_path, PathBuf::from("env.csv"));
        assert_eq!(config.report.target_campaigns, vec![CampaignId::new("936")]);
        assert_eq!(config.report.stats_mode, StatsMode::Published);
        assert!(!config.plot);

        let cli = crate::cli::Cli::parse_from(args(&["abdash", "report", "--data", "flag.csv"]));
        let Command::Report(report) = cli.command else {
            panic!("report expected");
        };
        assert_eq!(run_config_from_args(&report, &settings).data_path, PathBuf::from("flag.csv"));
    }
}
