//! `ad-ab-dashboard` library crate.
//!
//! The binary (`abdash`) is a thin wrapper around this library so that:
//!
//! - the analysis and chart specs are testable without spawning processes
//! - the same dashboard feeds the text report, the TUI and the HTML export
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod render;
pub mod report;
pub mod stats;
pub mod tui;
