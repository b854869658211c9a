//! The Interval Model: day-granular, half-open date-range arithmetic.
//!
//! A stay of N nights occupies the calendar days `check_in .. check_out - 1`;
//! the checkout day itself is free for a new check-in. Every comparison in
//! this module runs on normalized [`NaiveDate`] values and integer day
//! counts, so time-of-day and timezone drift cannot produce fractional-day
//! gaps.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Truncates a timestamp to calendar-day granularity.
///
/// Raw records may carry a time-of-day component (check-in at 15:00,
/// checkout at 11:00), but occupancy is day-granular. All interval
/// arithmetic must go through this before comparing anything.
pub fn normalize(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Number of nights between a check-in and a checkout timestamp.
///
/// Zero is a legal result (a degenerate, zero-night range); a negative
/// difference is an [`CoreError::InvalidRange`] and is never clamped.
pub fn nights(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<i64, CoreError> {
    let check_in = normalize(check_in);
    let check_out = normalize(check_out);
    let n = (check_out - check_in).num_days();
    if n < 0 {
        return Err(CoreError::InvalidRange {
            check_in,
            check_out,
        });
    }
    Ok(n)
}

/// A half-open booked date range: `[check_in, check_out)`.
///
/// Construction validates ordering, so every `DateInterval` in the system
/// is known to be well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateInterval {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateInterval {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, CoreError> {
        if check_out < check_in {
            return Err(CoreError::InvalidRange {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Builds an interval from raw record timestamps, normalizing both ends.
    pub fn from_timestamps(
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        Self::new(normalize(check_in), normalize(check_out))
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Stay length as an integer night count.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Whether `day` is occupied by this stay. The checkout day is not:
    /// a departing guest leaves it free for a same-day check-in.
    pub fn occupies(&self, day: NaiveDate) -> bool {
        day >= self.check_in && day < self.check_out
    }

    /// The single overlap predicate shared by both engines.
    ///
    /// Touching boundaries do not overlap: one stay's checkout day may be
    /// another stay's check-in day.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn iv(ci: (i32, u32, u32), co: (i32, u32, u32)) -> DateInterval {
        DateInterval::new(d(ci.0, ci.1, ci.2), d(co.0, co.1, co.2)).unwrap()
    }

    #[test]
    fn normalize_drops_time_of_day() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap();
        assert_eq!(normalize(ts), d(2024, 5, 1));
    }

    #[test]
    fn nights_counts_whole_days_regardless_of_times() {
        // Check-in at 23:00, checkout at 01:00 two days later is still
        // exactly two nights once normalized.
        let ci = Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
        let co = Utc.with_ymd_and_hms(2024, 5, 3, 1, 0, 0).unwrap();
        assert_eq!(nights(ci, co).unwrap(), 2);
    }

    #[test]
    fn nights_rejects_reversed_range() {
        let ci = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
        let co = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            nights(ci, co),
            Err(CoreError::InvalidRange { .. })
        ));
    }

    #[test]
    fn zero_night_range_is_legal() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(nights(ts, ts).unwrap(), 0);
    }

    #[test]
    fn occupies_is_half_open() {
        let stay = iv((2024, 5, 1), (2024, 5, 5));
        assert!(stay.occupies(d(2024, 5, 1)));
        assert!(stay.occupies(d(2024, 5, 4)));
        assert!(!stay.occupies(d(2024, 5, 5))); // checkout day is free
        assert!(!stay.occupies(d(2024, 4, 30)));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = iv((2024, 5, 1), (2024, 5, 5));
        let b = iv((2024, 5, 5), (2024, 5, 10));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn straddling_intervals_overlap() {
        let a = iv((2024, 5, 1), (2024, 5, 5));
        let b = iv((2024, 5, 4), (2024, 5, 10));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_interval_overlaps() {
        let outer = iv((2024, 5, 1), (2024, 5, 10));
        let inner = iv((2024, 5, 3), (2024, 5, 4));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
