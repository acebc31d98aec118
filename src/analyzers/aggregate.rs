use crate::analyzers::types::{HourlyUsage, UsageSummary, WeatherEffect};
use crate::analyzers::utility::{mean, round2, stddev};
use crate::dataset::{RentalRecord, WeatherCode};
use std::collections::BTreeMap;

/// Running total for a group.
#[derive(Debug, Default, Clone, Copy)]
struct SumAccumulator {
    sum: u64,
}

impl SumAccumulator {
    fn push(&mut self, value: u64) {
        self.sum = self.sum.saturating_add(value);
    }
}

/// Running sum and size of a group, for the arithmetic mean.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: u64,
    n: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: u64) {
        self.sum = self.sum.saturating_add(value);
        self.n += 1;
    }

    fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum as f64 / self.n as f64
        }
    }
}

/// Sums `count` per hour of day. One row per hour present, ascending by hour.
pub fn hourly_usage(records: &[RentalRecord]) -> Vec<HourlyUsage> {
    let mut groups: BTreeMap<u8, SumAccumulator> = BTreeMap::new();

    for record in records {
        groups.entry(record.hour).or_default().push(record.count);
    }

    groups
        .into_iter()
        .map(|(hour, acc)| HourlyUsage {
            hour,
            total_usage: acc.sum,
        })
        .collect()
}

/// Averages `count` per weather code. One row per code present, ascending by code.
pub fn weather_effect(records: &[RentalRecord]) -> Vec<WeatherEffect> {
    let mut groups: BTreeMap<&WeatherCode, MeanAccumulator> = BTreeMap::new();

    for record in records {
        groups.entry(&record.weather).or_default().push(record.count);
    }

    groups
        .into_iter()
        .map(|(weather, acc)| WeatherEffect {
            weather: weather.clone(),
            average_usage: acc.mean(),
            records: acc.n,
        })
        .collect()
}

/// Headline metrics over the hourly table.
///
/// The peak hour is the hour with the largest total; ties go to the earliest hour.
pub fn summarize(records: &[RentalRecord], hourly: &[HourlyUsage]) -> UsageSummary {
    let totals: Vec<f64> = hourly.iter().map(|h| h.total_usage as f64).collect();
    let avg = mean(&totals);

    let peak_hour = hourly
        .iter()
        .fold(None::<&HourlyUsage>, |best, h| match best {
            Some(b) if b.total_usage >= h.total_usage => Some(b),
            _ => Some(h),
        })
        .map(|h| h.hour);

    UsageSummary {
        record_count: records.len(),
        total_usage: hourly
            .iter()
            .fold(0u64, |acc, h| acc.saturating_add(h.total_usage)),
        average_hourly_usage: round2(avg),
        hourly_stddev: stddev(&totals, avg),
        peak_hour,
    }
}
