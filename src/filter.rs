//! Inclusive date-range filtering of rental records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::RentalRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("start date {start} must not be after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Inclusive date interval. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Records dated inside the range. Records without a date never match.
    pub fn apply(&self, records: &[RentalRecord]) -> Vec<RentalRecord> {
        records
            .iter()
            .filter(|r| r.date.is_some_and(|d| self.contains(d)))
            .cloned()
            .collect()
    }
}

/// Returns the records whose date lies in `[start, end]`.
///
/// # Errors
///
/// Returns [`RangeError::StartAfterEnd`] without filtering anything when
/// `start > end`.
pub fn filter_by_date(
    records: &[RentalRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RentalRecord>, RangeError> {
    Ok(DateRange::new(start, end)?.apply(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, day).unwrap()
    }

    fn records() -> Vec<RentalRecord> {
        vec![
            RentalRecord::new(Some(d(1)), 0, "1", 10),
            RentalRecord::new(Some(d(2)), 1, "1", 20),
            RentalRecord::new(Some(d(3)), 2, "2", 30),
            RentalRecord::new(None, 3, "2", 40),
            RentalRecord::new(Some(d(5)), 4, "3", 50),
        ]
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filtered = filter_by_date(&records(), d(2), d(3)).unwrap();
        let counts: Vec<u64> = filtered.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![20, 30]);
    }

    #[test]
    fn test_single_day_range() {
        let filtered = filter_by_date(&records(), d(5), d(5)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].count, 50);
    }

    #[test]
    fn test_start_after_end_rejected() {
        let err = filter_by_date(&records(), d(3), d(2)).unwrap_err();
        assert_eq!(
            err,
            RangeError::StartAfterEnd {
                start: d(3),
                end: d(2)
            }
        );
        assert!(err.to_string().contains("must not be after"));
    }

    #[test]
    fn test_undated_records_always_excluded() {
        let all = filter_by_date(&records(), d(1), d(31)).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|r| r.date.is_some()));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_by_date(&records(), d(2), d(5)).unwrap();
        let twice = filter_by_date(&once, d(2), d(5)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(filter_by_date(&[], d(1), d(2)).unwrap().is_empty());
    }

    #[test]
    fn test_range_days() {
        assert_eq!(DateRange::new(d(1), d(1)).unwrap().days(), 1);
        assert_eq!(DateRange::new(d(1), d(10)).unwrap().days(), 10);
    }
}
