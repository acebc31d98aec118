//! Display labels for weather codes.
//!
//! Labels are looked up by code, never by position, and every code in a
//! dataset must have one before anything is rendered.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::Path;

use crate::analyzers::types::{WeatherBar, WeatherEffect};
use crate::dataset::WeatherCode;

/// Default names, keyed by the 1-based `weathersit` codes of the bike-sharing data.
///
/// | Code | Label      |
/// |------|------------|
/// | 1    | Clear      |
/// | 2    | Cloudy     |
/// | 3    | Light rain |
/// | 4    | Heavy rain |
static DEFAULT_LABELS: &[(&str, &str)] = &[
    ("1", "Clear"),
    ("2", "Cloudy"),
    ("3", "Light rain"),
    ("4", "Heavy rain"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("no label configured for weather code(s): {}", join_codes(.codes))]
    Unmapped { codes: Vec<WeatherCode> },
}

fn join_codes(codes: &[WeatherCode]) -> String {
    codes
        .iter()
        .map(WeatherCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Explicit weather code → label mapping.
///
/// Can be loaded from a JSON object on disk:
/// ```json
/// {
///   "1": "Clear",
///   "2": "Cloudy"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherLabels {
    entries: BTreeMap<WeatherCode, String>,
}

impl Default for WeatherLabels {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_LABELS.iter().copied())
    }
}

impl WeatherLabels {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(code, label)| (WeatherCode::new(code), label.to_string()))
                .collect(),
        }
    }

    /// Parses a JSON object of `code: label` pairs.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(content).context("weather labels must be a JSON object of strings")?;

        if let Some((code, _)) = raw.iter().find(|(_, label)| label.trim().is_empty()) {
            bail!("weather code '{code}' has an empty label");
        }

        Ok(Self::from_pairs(
            raw.iter().map(|(code, label)| (code.as_str(), label.trim())),
        ))
    }

    /// Loads the mapping from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weather labels from {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn get(&self, code: &WeatherCode) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks that every code has a label, reporting all missing codes at once.
    pub fn validate<'a>(&self, codes: impl IntoIterator<Item = &'a WeatherCode>) -> Result<(), LabelError> {
        let mut unmapped: Vec<WeatherCode> = codes
            .into_iter()
            .filter(|code| !self.entries.contains_key(*code))
            .cloned()
            .collect();

        if unmapped.is_empty() {
            return Ok(());
        }

        unmapped.sort();
        unmapped.dedup();
        Err(LabelError::Unmapped { codes: unmapped })
    }
}

/// Attaches labels to weather rows and flags the maximum-average bar(s).
pub fn assign_labels(rows: &[WeatherEffect], labels: &WeatherLabels) -> Result<Vec<WeatherBar>, LabelError> {
    labels.validate(rows.iter().map(|row| &row.weather))?;

    let max = rows
        .iter()
        .map(|row| row.average_usage)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(rows
        .iter()
        .map(|row| WeatherBar {
            weather: row.weather.clone(),
            label: labels.get(&row.weather).unwrap_or_default().to_string(),
            average_usage: row.average_usage,
            records: row.records,
            highlighted: row.average_usage == max,
        })
        .collect())
}
