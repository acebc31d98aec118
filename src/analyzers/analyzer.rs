use crate::analyzers::aggregate::{hourly_usage, summarize, weather_effect};
use crate::analyzers::labels::{LabelError, WeatherLabels, assign_labels};
use crate::analyzers::types::DashboardView;
use crate::dataset::RentalRecord;
use crate::filter::DateRange;
use chrono::Utc;
use tracing::debug;

/// Version of the [`DashboardView`] layout emitted as JSON.
pub const SCHEMA_VERSION: u8 = 1;

/// Narrows `records` to `range` and builds a fresh [`DashboardView`].
///
/// Nothing is cached: every call recomputes both tables from the input.
pub fn analyze(
    records: &[RentalRecord],
    range: DateRange,
    labels: &WeatherLabels,
) -> Result<DashboardView, LabelError> {
    let filtered = range.apply(records);
    debug!(
        start = %range.start(),
        end = %range.end(),
        input = records.len(),
        kept = filtered.len(),
        "Applied date range"
    );

    let hourly = hourly_usage(&filtered);
    let weather = assign_labels(&weather_effect(&filtered), labels)?;
    let summary = summarize(&filtered, &hourly);
    let top_weather = weather
        .iter()
        .find(|bar| bar.highlighted)
        .map(|bar| bar.weather.clone());

    Ok(DashboardView {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        range,
        summary,
        hourly,
        weather,
        top_weather,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::WeatherCode;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 5, day).unwrap()
    }

    fn records() -> Vec<RentalRecord> {
        vec![
            RentalRecord::new(Some(d(1)), 8, "1", 100),
            RentalRecord::new(Some(d(1)), 17, "2", 60),
            RentalRecord::new(Some(d(2)), 8, "1", 120),
            RentalRecord::new(Some(d(3)), 17, "3", 10),
            RentalRecord::new(None, 8, "1", 1000),
        ]
    }

    #[test]
    fn test_analyze_restricts_to_range() {
        let range = DateRange::new(d(1), d(2)).unwrap();
        let view = analyze(&records(), range, &WeatherLabels::default()).unwrap();

        assert_eq!(view.schema_version, SCHEMA_VERSION);
        assert_eq!(view.summary.record_count, 3);
        assert_eq!(view.summary.total_usage, 280);
        assert_eq!(view.hourly.len(), 2);
        assert_eq!(view.weather.len(), 2);
        assert_eq!(view.top_weather, Some(WeatherCode::new("1")));
    }

    #[test]
    fn test_analyze_empty_range_is_not_an_error() {
        let range = DateRange::new(d(20), d(21)).unwrap();
        let view = analyze(&records(), range, &WeatherLabels::default()).unwrap();

        assert!(view.hourly.is_empty());
        assert!(view.weather.is_empty());
        assert_eq!(view.summary.total_usage, 0);
        assert_eq!(view.top_weather, None);
    }

    #[test]
    fn test_top_weather_tie_goes_to_lowest_code() {
        let records = vec![
            RentalRecord::new(Some(d(1)), 8, "2", 40),
            RentalRecord::new(Some(d(1)), 9, "1", 40),
            RentalRecord::new(Some(d(1)), 9, "3", 5),
        ];
        let range = DateRange::new(d(1), d(1)).unwrap();
        let view = analyze(&records, range, &WeatherLabels::default()).unwrap();

        assert_eq!(view.top_weather, Some(WeatherCode::new("1")));
    }

    #[test]
    fn test_analyze_surfaces_unmapped_codes() {
        let labels = WeatherLabels::from_pairs([("1", "Clear")]);
        let range = DateRange::new(d(1), d(3)).unwrap();
        assert!(analyze(&records(), range, &labels).is_err());
    }
}
