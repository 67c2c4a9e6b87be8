//! Environment settings.
//!
//! A `.env` file in the working directory is loaded first if present. CLI
//! flags take precedence over anything read here.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DATA_PATH: &str = "data.csv";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Input CSV used when `--data` is not given (ABDASH_DATA).
    pub data_path: PathBuf,
    /// `tracing` filter directives (ABDASH_LOG).
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_path: non_empty("ABDASH_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            log_filter: non_empty("ABDASH_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Install the stderr subscriber. Invalid directives fall back to the default level.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        // A second call (tests, embedding) keeps the first subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_blank() {
        let s = Settings::from_lookup(|key| (key == "ABDASH_LOG").then(|| "  ".to_string()));
        assert_eq!(s.data_path, PathBuf::from("data.csv"));
        assert_eq!(s.log_filter, "warn");
    }

    #[test]
    fn reads_both_variables() {
        let s = Settings::from_lookup(|key| match key {
            "ABDASH_DATA" => Some("ads/KAG_conversion_data.csv".to_string()),
            "ABDASH_LOG" => Some("ad_ab_dashboard=debug".to_string()),
            _ => None,
        });
        assert_eq!(s.data_path, PathBuf::from("ads/KAG_conversion_data.csv"));
        assert_eq!(s.log_filter, "ad_ab_dashboard=debug");
    }
}
