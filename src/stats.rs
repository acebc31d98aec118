use serde::Serialize;

use crate::parser::RecordError;

/// Tally of what happened to each input row while loading a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub accepted: usize,

    // rejected rows, by reason
    pub bad_count: usize,
    pub bad_hour: usize,
    pub missing_weather: usize,

    // accepted rows whose date could not be parsed
    pub unparsable_dates: usize,
}

impl LoadReport {
    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn rejected(&self) -> usize {
        self.bad_count + self.bad_hour + self.missing_weather
    }

    pub fn accepted_pct(&self) -> f64 {
        Self::pct(self.accepted, self.rows_read)
    }

    /// Count a row the parser refused.
    pub fn record_rejection(&mut self, err: &RecordError) {
        match err {
            RecordError::Count { .. } => self.bad_count += 1,
            RecordError::Hour { .. } => self.bad_hour += 1,
            RecordError::MissingWeather => self.missing_weather += 1,
        }
    }
}
