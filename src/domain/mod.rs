//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`AdRecord`, `Gender`, `CampaignId`)
//! - the numeric columns (`Metric`) and the fixed report constants
//! - run configuration (`ReportConfig`, `RunConfig`, `StatsMode`)

pub mod types;

pub use types::*;
