use crate::error::AvailabilityError;
use crate::slot::{AvailabilityCheck, AvailabilitySlot, StayConflict, UnavailableReason};
use chrono::{Duration, NaiveDate};
use configuration::AvailabilityRules;
use core_types::{DateInterval, PropertyStaySettings, Reservation};
use tracing::debug;

/// A stateless calculator for a single property's booking calendar.
///
/// "Today" is always an explicit parameter: days strictly in the past are
/// never reported as free, and keeping the clock out of the engine keeps
/// every computation deterministic.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityEngine {
    rules: AvailabilityRules,
}

impl AvailabilityEngine {
    pub fn new(rules: AvailabilityRules) -> Self {
        Self { rules }
    }

    /// Computes the maximal contiguous free date ranges over the horizon
    /// `[horizon_start, horizon_end]` (inclusive calendar days).
    ///
    /// Cancelled reservations and records without a well-formed date range
    /// do not occupy anything. The result is sorted ascending by start
    /// date, pairwise disjoint, and capped at the configured slot limit.
    /// Ranges shorter than the significant-gap threshold or the property's
    /// minimum stay are discarded: fragments between bookings are not
    /// marketable and must not be surfaced.
    pub fn compute_free_ranges(
        &self,
        reservations: &[Reservation],
        settings: &PropertyStaySettings,
        horizon_start: NaiveDate,
        horizon_end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        validate_settings(settings)?;
        // Validates horizon ordering with the same error as any other range.
        DateInterval::new(horizon_start, horizon_end)?;

        // Past days are never free. Clamping the walk's starting point is
        // all it takes: everything before it is simply not visited.
        let start = horizon_start.max(today);
        if start > horizon_end {
            return Ok(Vec::new());
        }

        let occupied = merged_occupancy(reservations);

        // Walk the sorted, disjoint occupancy list and collect the gaps.
        // O(bookings log bookings), independent of the horizon length.
        let mut slots = Vec::new();
        let mut cursor = start;
        for stay in &occupied {
            if stay.check_in() > horizon_end {
                break;
            }
            if stay.check_in() > cursor {
                push_slot(&mut slots, cursor, stay.check_in() - Duration::days(1), settings, &self.rules);
            }
            cursor = cursor.max(stay.check_out());
            if cursor > horizon_end {
                break;
            }
        }
        if cursor <= horizon_end {
            push_slot(&mut slots, cursor, horizon_end, settings, &self.rules);
        }

        slots.truncate(self.rules.max_slots);
        debug!(
            slots = slots.len(),
            occupied = occupied.len(),
            %start,
            %horizon_end,
            "computed free ranges"
        );
        Ok(slots)
    }

    /// Point query: is the specific stay `[check_in, check_out)` bookable?
    ///
    /// Stay-length violations and conflicts are business outcomes, returned
    /// as a structured [`AvailabilityCheck`]; only a malformed request is
    /// an error. A request whose checkout equals an existing check-in does
    /// not conflict (half-open semantics).
    pub fn check_availability(
        &self,
        reservations: &[Reservation],
        settings: &PropertyStaySettings,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<AvailabilityCheck, AvailabilityError> {
        validate_settings(settings)?;
        let requested = DateInterval::new(check_in, check_out)?;
        let nights = requested.nights();

        if nights < settings.min_stay {
            return Ok(AvailabilityCheck::unavailable(
                nights,
                UnavailableReason::MinStay {
                    min_stay: settings.min_stay,
                },
                Vec::new(),
            ));
        }
        if nights > settings.max_stay {
            return Ok(AvailabilityCheck::unavailable(
                nights,
                UnavailableReason::MaxStay {
                    max_stay: settings.max_stay,
                },
                Vec::new(),
            ));
        }

        let conflicts: Vec<StayConflict> = reservations
            .iter()
            .filter(|r| r.status.is_active())
            .filter_map(|r| {
                let stay = r.interval()?;
                stay.overlaps(&requested).then(|| StayConflict {
                    check_in: stay.check_in(),
                    check_out: stay.check_out(),
                    guest: r.guest_email.clone(),
                })
            })
            .collect();

        if conflicts.is_empty() {
            Ok(AvailabilityCheck::available(nights))
        } else {
            debug!(conflicts = conflicts.len(), %check_in, %check_out, "stay request blocked");
            Ok(AvailabilityCheck::unavailable(
                nights,
                UnavailableReason::Occupied,
                conflicts,
            ))
        }
    }
}

fn validate_settings(settings: &PropertyStaySettings) -> Result<(), AvailabilityError> {
    if settings.min_stay < 1 {
        return Err(AvailabilityError::InvalidSettings(
            "min_stay must be at least 1".to_string(),
        ));
    }
    if settings.max_stay < settings.min_stay {
        return Err(AvailabilityError::InvalidSettings(
            "max_stay must not be less than min_stay".to_string(),
        ));
    }
    Ok(())
}

/// Collapses all active stays into a sorted list of disjoint occupied
/// intervals. Adjacent stays merge too: a back-to-back checkout/check-in
/// leaves no free day between them.
fn merged_occupancy(reservations: &[Reservation]) -> Vec<DateInterval> {
    let mut intervals: Vec<DateInterval> = reservations
        .iter()
        .filter(|r| r.status.is_active())
        .filter_map(Reservation::interval)
        .collect();
    intervals.sort();

    let mut merged: Vec<DateInterval> = Vec::with_capacity(intervals.len());
    for stay in intervals {
        match merged.last_mut() {
            Some(last) if stay.check_in() <= last.check_out() => {
                if stay.check_out() > last.check_out() {
                    // Safe to rebuild: both bounds are already validated.
                    *last = DateInterval::new(last.check_in(), stay.check_out())
                        .unwrap_or(*last);
                }
            }
            _ => merged.push(stay),
        }
    }
    merged
}

/// Appends the free range `[start, end]` as a slot if it clears both the
/// significant-gap threshold and the property's minimum stay.
fn push_slot(
    slots: &mut Vec<AvailabilitySlot>,
    start: NaiveDate,
    end: NaiveDate,
    settings: &PropertyStaySettings,
    rules: &AvailabilityRules,
) {
    let nights = (end - start).num_days();
    if nights < rules.significant_gap_nights || nights < settings.min_stay {
        return;
    }
    slots.push(AvailabilitySlot {
        start_date: start,
        end_date: end,
        nights,
        is_available: true,
        reason: Some("Available".to_string()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::ReservationStatus;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn booking(ci: (i32, u32, u32), co: (i32, u32, u32)) -> Reservation {
        let ts = |(y, m, day): (i32, u32, u32)| Utc.with_ymd_and_hms(y, m, day, 14, 0, 0).unwrap();
        Reservation {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            check_in: Some(ts(ci)),
            check_out: Some(ts(co)),
            status: ReservationStatus::Confirmed,
            total_amount: dec!(500),
            channel_commission: dec!(0),
            collection_commission: dec!(0),
            nights: None,
            guest_email: Some("guest@example.com".to_string()),
            channel_name: None,
        }
    }

    fn settings(min_stay: i64, max_stay: i64) -> PropertyStaySettings {
        PropertyStaySettings {
            min_stay,
            max_stay,
            check_in_time: chrono::NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            check_out_time: chrono::NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        }
    }

    fn engine() -> AvailabilityEngine {
        AvailabilityEngine::new(AvailabilityRules::default())
    }

    #[test]
    fn single_booking_splits_horizon_into_two_slots() {
        let bookings = vec![booking((2024, 6, 10), (2024, 6, 15))];
        let slots = engine()
            .compute_free_ranges(
                &bookings,
                &settings(2, 14),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 1, 1),
            )
            .unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_date, d(2024, 6, 1));
        assert_eq!(slots[0].end_date, d(2024, 6, 9));
        assert_eq!(slots[0].nights, 8);
        assert_eq!(slots[1].start_date, d(2024, 6, 15));
        assert_eq!(slots[1].end_date, d(2024, 6, 30));
        assert_eq!(slots[1].nights, 15);
        assert!(slots.iter().all(|s| s.is_available));
    }

    #[test]
    fn slots_are_sorted_disjoint_and_sound() {
        let bookings = vec![
            booking((2024, 6, 20), (2024, 6, 25)),
            booking((2024, 6, 5), (2024, 6, 10)),
            booking((2024, 6, 8), (2024, 6, 12)), // overlaps the previous one
        ];
        let slots = engine()
            .compute_free_ranges(
                &bookings,
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 1, 1),
            )
            .unwrap();

        let occupied = merged_occupancy(&bookings);
        for pair in slots.windows(2) {
            assert!(pair[0].end_date < pair[1].start_date, "slots must be disjoint and sorted");
        }
        for slot in &slots {
            let mut day = slot.start_date;
            while day <= slot.end_date {
                assert!(
                    !occupied.iter().any(|s| s.occupies(day)),
                    "day {day} inside a free slot is occupied"
                );
                day = day + Duration::days(1);
            }
        }
    }

    #[test]
    fn one_night_gap_between_bookings_is_not_surfaced() {
        // Free day June 10 only: below the 3-night significant-gap
        // threshold, even though a point query could approve it.
        let bookings = vec![
            booking((2024, 6, 1), (2024, 6, 10)),
            booking((2024, 6, 11), (2024, 6, 20)),
        ];
        let slots = engine()
            .compute_free_ranges(
                &bookings,
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 20),
                d(2024, 1, 1),
            )
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn threshold_respects_min_stay_when_larger() {
        // A 5-night gap clears the significant-gap threshold but not a
        // 7-night minimum stay.
        let bookings = vec![
            booking((2024, 6, 1), (2024, 6, 10)),
            booking((2024, 6, 15), (2024, 6, 25)),
        ];
        let slots = engine()
            .compute_free_ranges(
                &bookings,
                &settings(7, 30),
                d(2024, 6, 1),
                d(2024, 6, 25),
                d(2024, 1, 1),
            )
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn past_days_are_never_free() {
        let slots = engine()
            .compute_free_ranges(
                &[],
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 6, 20),
            )
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_date, d(2024, 6, 20));
        assert_eq!(slots[0].end_date, d(2024, 6, 30));
    }

    #[test]
    fn horizon_entirely_in_the_past_is_empty() {
        let slots = engine()
            .compute_free_ranges(
                &[],
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 7, 15),
            )
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn cancelled_bookings_do_not_occupy() {
        let mut cancelled = booking((2024, 6, 10), (2024, 6, 15));
        cancelled.status = ReservationStatus::Cancelled;
        let slots = engine()
            .compute_free_ranges(
                &[cancelled],
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 1, 1),
            )
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].nights, 29);
    }

    #[test]
    fn slot_cap_is_enforced() {
        // Tighten the cap rather than fabricating a hundred gaps; the
        // truncation path is identical.
        let rules = AvailabilityRules {
            max_slots: 1,
            ..AvailabilityRules::default()
        };
        let engine = AvailabilityEngine::new(rules);
        let bookings = vec![booking((2024, 6, 10), (2024, 6, 15))];
        let slots = engine
            .compute_free_ranges(
                &bookings,
                &settings(1, 30),
                d(2024, 6, 1),
                d(2024, 6, 30),
                d(2024, 1, 1),
            )
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_date, d(2024, 6, 1));
    }

    #[test]
    fn reversed_horizon_is_an_error() {
        let err = engine().compute_free_ranges(
            &[],
            &settings(1, 30),
            d(2024, 6, 30),
            d(2024, 6, 1),
            d(2024, 1, 1),
        );
        assert!(matches!(err, Err(AvailabilityError::InvalidRange(_))));
    }

    #[test]
    fn check_rejects_below_minimum_stay_regardless_of_conflicts() {
        let check = engine()
            .check_availability(&[], &settings(3, 14), d(2024, 6, 1), d(2024, 6, 3))
            .unwrap();
        assert!(!check.is_available);
        assert_eq!(check.nights, 2);
        assert_eq!(check.reason, Some(UnavailableReason::MinStay { min_stay: 3 }));
        assert!(check.conflicts.is_empty());
    }

    #[test]
    fn check_rejects_above_maximum_stay() {
        let check = engine()
            .check_availability(&[], &settings(1, 5), d(2024, 6, 1), d(2024, 6, 10))
            .unwrap();
        assert!(!check.is_available);
        assert_eq!(check.reason, Some(UnavailableReason::MaxStay { max_stay: 5 }));
    }

    #[test]
    fn touching_checkout_is_not_a_conflict() {
        let bookings = vec![booking((2024, 6, 10), (2024, 6, 15))];
        let check = engine()
            .check_availability(&bookings, &settings(2, 14), d(2024, 6, 15), d(2024, 6, 18))
            .unwrap();
        assert!(check.is_available);
        assert_eq!(check.nights, 3);

        // And ending exactly on the existing check-in is fine too.
        let check = engine()
            .check_availability(&bookings, &settings(2, 14), d(2024, 6, 7), d(2024, 6, 10))
            .unwrap();
        assert!(check.is_available);
    }

    #[test]
    fn overlapping_request_reports_the_conflicting_stay() {
        let bookings = vec![booking((2024, 6, 10), (2024, 6, 15))];
        let check = engine()
            .check_availability(&bookings, &settings(1, 14), d(2024, 6, 12), d(2024, 6, 16))
            .unwrap();
        assert!(!check.is_available);
        assert_eq!(check.reason, Some(UnavailableReason::Occupied));
        assert_eq!(check.conflicts.len(), 1);
        assert_eq!(check.conflicts[0].check_in, d(2024, 6, 10));
        assert_eq!(check.conflicts[0].check_out, d(2024, 6, 15));
        assert_eq!(check.conflicts[0].guest.as_deref(), Some("guest@example.com"));
    }

    #[test]
    fn reversed_request_is_an_error() {
        let err = engine().check_availability(&[], &settings(1, 14), d(2024, 6, 10), d(2024, 6, 5));
        assert!(matches!(err, Err(AvailabilityError::InvalidRange(_))));
    }
}
