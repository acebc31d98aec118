//! A dashboard session: the dataset and labels loaded once at startup.
//!
//! Every render goes through the session, which recomputes the view from the
//! full dataset. The session owns no mutable state.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::info;

use crate::analyzers::analyzer::analyze;
use crate::analyzers::labels::{LabelError, WeatherLabels};
use crate::analyzers::types::DashboardView;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::fetch::auth::Bearer;
use crate::fetch::{BasicClient, HttpClient, read_source};
use crate::filter::{DateRange, RangeError};
use crate::parser::parse_records;

#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Dataset,
    labels: WeatherLabels,
    bounds: DateRange,
}

impl DashboardSession {
    /// Validates the dataset against the labels and fixes the default range.
    ///
    /// # Errors
    ///
    /// Fails when the dataset has no usable records, no record carries a
    /// parsable date, or a weather code has no label.
    pub fn new(dataset: Dataset, labels: WeatherLabels) -> Result<Self> {
        if dataset.is_empty() {
            bail!("dataset contains no usable records");
        }

        labels
            .validate(dataset.weather_codes().iter())
            .context("weather labels do not cover the dataset")?;

        let (start, end) = dataset
            .date_bounds()
            .context("no record in the dataset has a parsable date")?;
        let bounds = DateRange::new(start, end)?;

        info!(
            records = dataset.records().len(),
            start = %start,
            end = %end,
            weather_codes = dataset.weather_codes().len(),
            "Dashboard session ready"
        );

        Ok(Self {
            dataset,
            labels,
            bounds,
        })
    }

    /// Loads the configured source and labels.
    pub async fn load(config: &DashboardConfig) -> Result<Self> {
        let labels = config.weather_labels()?;
        let client = BasicClient::new()?;

        match &config.source_token {
            Some(token) => {
                let client = Bearer::new(client, token)?;
                Self::load_with(&client, &config.source, labels).await
            }
            None => Self::load_with(&client, &config.source, labels).await,
        }
    }

    pub async fn load_with<C: HttpClient>(client: &C, source: &str, labels: WeatherLabels) -> Result<Self> {
        let bytes = read_source(client, source).await?;
        let dataset = parse_records(&bytes).with_context(|| format!("failed to parse {source}"))?;
        Self::new(dataset, labels)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Full span of the dataset, the range shown before the user picks one.
    pub fn default_range(&self) -> DateRange {
        self.bounds
    }

    /// Builds a range, filling a missing bound from the dataset span.
    pub fn range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange, RangeError> {
        DateRange::new(
            start.unwrap_or(self.bounds.start()),
            end.unwrap_or(self.bounds.end()),
        )
    }

    /// Recomputes the dashboard for `range`.
    pub fn render(&self, range: DateRange) -> Result<DashboardView, LabelError> {
        analyze(self.dataset.records(), range, &self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RentalRecord;
    use crate::stats::LoadReport;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, month, day).unwrap()
    }

    fn dataset(records: Vec<RentalRecord>) -> Dataset {
        Dataset::new(records, LoadReport::default())
    }

    fn session() -> DashboardSession {
        DashboardSession::new(
            dataset(vec![
                RentalRecord::new(Some(d(1, 1)), 0, "1", 10),
                RentalRecord::new(Some(d(3, 1)), 1, "2", 20),
                RentalRecord::new(Some(d(6, 30)), 2, "1", 30),
            ]),
            WeatherLabels::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_range_spans_dataset() {
        let range = session().default_range();
        assert_eq!(range.start(), d(1, 1));
        assert_eq!(range.end(), d(6, 30));
    }

    #[test]
    fn test_range_fills_missing_bounds() {
        let s = session();
        let range = s.range(Some(d(2, 1)), None).unwrap();
        assert_eq!(range.start(), d(2, 1));
        assert_eq!(range.end(), d(6, 30));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let s = session();
        assert!(s.range(Some(d(5, 1)), Some(d(4, 1))).is_err());
        assert!(s.range(Some(d(12, 1)), None).is_err());
    }

    #[test]
    fn test_render_recomputes_per_range() {
        let s = session();
        let full = s.render(s.default_range()).unwrap();
        let part = s.render(s.range(Some(d(3, 1)), None).unwrap()).unwrap();

        assert_eq!(full.summary.total_usage, 60);
        assert_eq!(part.summary.total_usage, 50);
        // the session is untouched by earlier renders
        assert_eq!(s.render(s.default_range()).unwrap().summary, full.summary);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(DashboardSession::new(dataset(vec![]), WeatherLabels::default()).is_err());
    }

    #[test]
    fn test_undated_dataset_rejected() {
        let err = DashboardSession::new(
            dataset(vec![RentalRecord::new(None, 0, "1", 1)]),
            WeatherLabels::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("parsable date"));
    }

    #[test]
    fn test_unmapped_weather_code_rejected_at_load() {
        let err = DashboardSession::new(
            dataset(vec![RentalRecord::new(Some(d(1, 1)), 0, "5", 1)]),
            WeatherLabels::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("weather code(s): 5"));
    }
}
