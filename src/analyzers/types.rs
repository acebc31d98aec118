//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::WeatherCode;
use crate::filter::DateRange;

/// Total rentals for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyUsage {
    pub hour: u8,
    pub total_usage: u64,
}

/// Mean rentals across all records sharing a weather code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherEffect {
    pub weather: WeatherCode,
    pub average_usage: f64,
    pub records: usize,
}

/// A [`WeatherEffect`] ready for the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherBar {
    pub weather: WeatherCode,
    pub label: String,
    pub average_usage: f64,
    pub records: usize,
    /// Set on the bar(s) carrying the maximum average.
    pub highlighted: bool,
}

/// Headline metrics shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub record_count: usize,
    pub total_usage: u64,
    /// Mean of the hourly totals, rounded to two decimals.
    pub average_hourly_usage: f64,
    pub hourly_stddev: f64,
    pub peak_hour: Option<u8>,
}

/// Everything one render of the dashboard needs.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub range: DateRange,
    pub summary: UsageSummary,
    pub hourly: Vec<HourlyUsage>,
    pub weather: Vec<WeatherBar>,
    /// Code of the maximum-average bar (the lowest code on a tie).
    pub top_weather: Option<WeatherCode>,
}
