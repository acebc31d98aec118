//! CSV parser for rental tables.
//!
//! Columns are located by header name, so extra columns are ignored and the
//! common spellings of the bike-sharing exports (`dteday`, `hr`, `weathersit`,
//! `cnt`, and the `_x` suffixes left behind by a merge) are accepted.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, RentalRecord, WeatherCode, parse_whole};
use crate::stats::LoadReport;

const DATE_COLUMNS: &[&str] = &["date", "dteday"];
const HOUR_COLUMNS: &[&str] = &["hour", "hr"];
const WEATHER_COLUMNS: &[&str] = &["weather", "weather_x", "weathersit"];
const COUNT_COLUMNS: &[&str] = &["count", "count_x", "cnt"];

/// Why a single row was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("count '{value}' is not a non-negative integer")]
    Count { value: String },
    #[error("hour '{value}' is not in 0..=23")]
    Hour { value: String },
    #[error("weather code is empty")]
    MissingWeather,
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    date: usize,
    hour: usize,
    weather: usize,
    count: usize,
}

impl ColumnMap {
    /// Resolves each required column, taking the first matching alias.
    pub fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            names.iter().find_map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name))
            })
        };

        let mut missing = Vec::new();
        let mut lookup = |names: &[&'static str]| {
            let idx = find(names);
            if idx.is_none() {
                missing.push(names[0]);
            }
            idx.unwrap_or_default()
        };

        let map = Self {
            date: lookup(DATE_COLUMNS),
            hour: lookup(HOUR_COLUMNS),
            weather: lookup(WEATHER_COLUMNS),
            count: lookup(COUNT_COLUMNS),
        };

        if !missing.is_empty() {
            bail!("input table is missing required column(s): {}", missing.join(", "));
        }

        Ok(map)
    }
}

/// Parses a date cell. Accepts plain dates, naive timestamps and RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.date());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive())
}

// Integral floats ("12.0") are how pandas writes integer columns that held NaN.
fn parse_count(raw: &str) -> Result<u64, RecordError> {
    parse_whole(raw)
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| RecordError::Count {
            value: raw.trim().to_string(),
        })
}

fn parse_hour(raw: &str) -> Result<u8, RecordError> {
    match parse_whole(raw) {
        Some(hour @ 0..=23) => Ok(hour as u8),
        _ => Err(RecordError::Hour {
            value: raw.trim().to_string(),
        }),
    }
}

/// Converts one CSV row into a [`RentalRecord`].
///
/// An unparsable date is not an error: the record is kept with `date: None`.
pub fn parse_row(columns: &ColumnMap, row: &StringRecord) -> Result<RentalRecord, RecordError> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let count = parse_count(cell(columns.count))?;
    let hour = parse_hour(cell(columns.hour))?;
    let weather = cell(columns.weather).trim();
    if weather.is_empty() {
        return Err(RecordError::MissingWeather);
    }

    Ok(RentalRecord {
        date: parse_date(cell(columns.date)),
        hour,
        weather: WeatherCode::new(weather),
        count,
    })
}

/// Decodes a CSV table into a [`Dataset`].
///
/// Rows with an invalid `count`, `hour` or `weather` are dropped and tallied
/// in the dataset's [`LoadReport`].
///
/// # Errors
///
/// Returns an error if the bytes are not a well-formed CSV table or a
/// required column is missing.
pub fn parse_records(bytes: &[u8]) -> Result<Dataset> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let headers = rdr.headers().context("failed to read CSV header")?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("malformed CSV row {}", line + 2))?;
        report.rows_read += 1;

        match parse_row(&columns, &row) {
            Ok(record) => {
                if record.date.is_none() {
                    debug!(row = line + 2, "Unparsable date, record excluded from ranges");
                    report.unparsable_dates += 1;
                }
                report.accepted += 1;
                records.push(record);
            }
            Err(e) => {
                warn!(row = line + 2, error = %e, "Rejected input row");
                report.record_rejection(&e);
            }
        }
    }

    info!(
        rows_read = report.rows_read,
        accepted = report.accepted,
        rejected = report.rejected(),
        unparsable_dates = report.unparsable_dates,
        "Dataset parsed"
    );

    Ok(Dataset::new(records, report))
}
