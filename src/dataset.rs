//! Typed rental records and the in-memory dataset they are held in.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::stats::LoadReport;

/// Parses a whole number, also accepting integral floats such as `"8.0"`.
pub fn parse_whole(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => Some(v as i64),
        _ => None,
    }
}

/// Categorical weather code as it appears in the input table (e.g. `"1"`).
///
/// Numeric codes are normalised (`"1.0"` and `"01"` become `"1"`) and sort by
/// value, ahead of any non-numeric codes, which sort as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WeatherCode(String);

impl WeatherCode {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let code = code.trim();
        match parse_whole(code) {
            Some(v) => Self(v.to_string()),
            None => Self(code.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl Ord for WeatherCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for WeatherCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeatherCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One row of the input table: rentals for a date/hour/weather bucket.
///
/// `date` is `None` when the source value could not be parsed; such records
/// never survive a date filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalRecord {
    pub date: Option<NaiveDate>,
    pub hour: u8,
    pub weather: WeatherCode,
    pub count: u64,
}

impl RentalRecord {
    pub fn new(date: Option<NaiveDate>, hour: u8, weather: impl Into<WeatherCode>, count: u64) -> Self {
        Self {
            date,
            hour,
            weather: weather.into(),
            count,
        }
    }
}

/// Records loaded for a dashboard session, plus what the loader saw.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RentalRecord>,
    report: LoadReport,
}

impl Dataset {
    pub fn new(records: Vec<RentalRecord>, report: LoadReport) -> Self {
        Self { records, report }
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest parsable dates, used as the default range.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Distinct weather codes in ascending order.
    pub fn weather_codes(&self) -> Vec<WeatherCode> {
        let mut codes: Vec<WeatherCode> = self.records.iter().map(|r| r.weather.clone()).collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_weather_code_trims_whitespace() {
        assert_eq!(WeatherCode::new(" 2 ").as_str(), "2");
    }

    #[test]
    fn test_weather_code_normalises_numbers() {
        assert_eq!(WeatherCode::new("1.0"), WeatherCode::new("1"));
        assert_eq!(WeatherCode::new("03").as_str(), "3");
        assert_eq!(WeatherCode::new("fog").as_str(), "fog");
        assert_eq!(WeatherCode::new("2.5").as_str(), "2.5");
    }

    #[test]
    fn test_weather_codes_sort_numerically() {
        let mut codes: Vec<WeatherCode> = ["10", "2", "B", "1", "A"]
            .into_iter()
            .map(WeatherCode::new)
            .collect();
        codes.sort();
        let order: Vec<&str> = codes.iter().map(WeatherCode::as_str).collect();
        assert_eq!(order, vec!["1", "2", "10", "A", "B"]);
    }

    #[test]
    fn test_parse_whole() {
        assert_eq!(parse_whole("8"), Some(8));
        assert_eq!(parse_whole(" 8.0 "), Some(8));
        assert_eq!(parse_whole("-3"), Some(-3));
        assert_eq!(parse_whole("2.5"), None);
        assert_eq!(parse_whole("NaN"), None);
        assert_eq!(parse_whole("abc"), None);
    }

    #[test]
    fn test_date_bounds_skips_missing_dates() {
        let dataset = Dataset::new(
            vec![
                RentalRecord::new(date(2012, 3, 4), 0, "1", 1),
                RentalRecord::new(None, 0, "1", 1),
                RentalRecord::new(date(2011, 1, 1), 5, "2", 1),
                RentalRecord::new(date(2012, 12, 31), 5, "2", 1),
            ],
            LoadReport::default(),
        );

        assert_eq!(
            dataset.date_bounds(),
            Some((date(2011, 1, 1).unwrap(), date(2012, 12, 31).unwrap()))
        );
    }

    #[test]
    fn test_date_bounds_none_without_dates() {
        let dataset = Dataset::new(
            vec![RentalRecord::new(None, 0, "1", 1)],
            LoadReport::default(),
        );
        assert_eq!(dataset.date_bounds(), None);
    }

    #[test]
    fn test_weather_codes_sorted_and_distinct() {
        let dataset = Dataset::new(
            vec![
                RentalRecord::new(None, 0, "3", 1),
                RentalRecord::new(None, 0, "1", 1),
                RentalRecord::new(None, 0, "3", 1),
            ],
            LoadReport::default(),
        );
        assert_eq!(
            dataset.weather_codes(),
            vec![WeatherCode::new("1"), WeatherCode::new("3")]
        );
    }
}
