//! Runtime configuration read from the environment (and `.env`).

use anyhow::Result;
use std::path::PathBuf;

use crate::analyzers::labels::WeatherLabels;

pub const DEFAULT_SOURCE: &str = "all_data.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/bike_dashboard.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Path or `http(s)://` URL of the rental table.
    pub source: String,
    /// Optional JSON file overriding the weather labels.
    pub labels_path: Option<PathBuf>,
    /// Bearer token for remote sources.
    pub source_token: Option<String>,
    pub log_file: PathBuf,
}

impl DashboardConfig {
    /// Reads `DASHBOARD_SOURCE`, `DASHBOARD_LABELS`, `DASHBOARD_SOURCE_TOKEN`
    /// and `LOG_FILE_PATH`, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            source: non_empty("DASHBOARD_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            labels_path: non_empty("DASHBOARD_LABELS").map(PathBuf::from),
            source_token: non_empty("DASHBOARD_SOURCE_TOKEN"),
            log_file: non_empty("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// The configured label file, or the built-in labels.
    pub fn weather_labels(&self) -> Result<WeatherLabels> {
        match &self.labels_path {
            Some(path) => WeatherLabels::load(path),
            None => Ok(WeatherLabels::default()),
        }
    }
}
