//! Window-level properties of the overview computation: splitting a
//! reporting period must never create or destroy revenue, and the
//! prior-window comparison must distinguish "no baseline" from "no change".

use analytics::{OverviewEngine, OverviewInputs};
use chrono::{NaiveDate, TimeZone, Utc};
use configuration::FinanceRules;
use core_types::{Reservation, ReservationStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn stay(ci: (i32, u32, u32), co: (i32, u32, u32), amount: Decimal) -> Reservation {
    let ts = |(y, m, day): (i32, u32, u32)| Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap();
    Reservation {
        id: Uuid::new_v4(),
        property_id: Uuid::new_v4(),
        check_in: Some(ts(ci)),
        check_out: Some(ts(co)),
        status: ReservationStatus::Confirmed,
        total_amount: amount,
        channel_commission: dec!(0),
        collection_commission: dec!(0),
        nights: None,
        guest_email: None,
        channel_name: None,
    }
}

fn window<'a>(
    from: NaiveDate,
    to: NaiveDate,
    reservations: &'a [Reservation],
    previous: &'a [Reservation],
) -> OverviewInputs<'a> {
    OverviewInputs {
        from,
        to,
        property_count: 1,
        reservations: Some(reservations),
        payments: Some(&[]),
        expenses: Some(&[]),
        previous_reservations: Some(previous),
    }
}

#[test]
fn revenue_is_idempotent_across_split_windows() {
    let engine = OverviewEngine::new(FinanceRules::default());
    let june: Vec<Reservation> = vec![
        stay((2024, 6, 2), (2024, 6, 5), dec!(120.50)),
        stay((2024, 6, 9), (2024, 6, 12), dec!(330.25)),
    ];
    let july: Vec<Reservation> = vec![stay((2024, 7, 3), (2024, 7, 10), dec!(549.25))];
    let all: Vec<Reservation> = june.iter().chain(july.iter()).cloned().collect();

    let first = engine
        .compute_overview(&window(d(2024, 6, 1), d(2024, 6, 30), &june, &[]))
        .unwrap();
    let second = engine
        .compute_overview(&window(d(2024, 7, 1), d(2024, 7, 31), &july, &[]))
        .unwrap();
    let combined = engine
        .compute_overview(&window(d(2024, 6, 1), d(2024, 7, 31), &all, &[]))
        .unwrap();

    assert_eq!(
        first.finances.total_revenue + second.finances.total_revenue,
        combined.finances.total_revenue
    );
}

#[test]
fn prior_window_feeds_the_comparison() {
    let engine = OverviewEngine::new(FinanceRules::default());
    let current = vec![stay((2024, 7, 5), (2024, 7, 8), dec!(200))];
    let previous = vec![
        stay((2024, 6, 5), (2024, 6, 8), dec!(100)),
        stay((2024, 6, 20), (2024, 6, 22), dec!(150)),
    ];

    let report = engine
        .compute_overview(&window(d(2024, 7, 1), d(2024, 7, 31), &current, &previous))
        .unwrap();
    assert_eq!(report.comparative.month_over_month.previous, dec!(250));
    assert_eq!(report.comparative.month_over_month.change, Some(dec!(-20)));

    let no_baseline = engine
        .compute_overview(&window(d(2024, 7, 1), d(2024, 7, 31), &current, &[]))
        .unwrap();
    assert_eq!(no_baseline.comparative.month_over_month.change, None);
}

#[test]
fn cancelled_prior_stays_are_not_a_baseline() {
    let engine = OverviewEngine::new(FinanceRules::default());
    let current = vec![stay((2024, 7, 5), (2024, 7, 8), dec!(200))];
    let mut cancelled = stay((2024, 6, 5), (2024, 6, 8), dec!(500));
    cancelled.status = ReservationStatus::Cancelled;
    let previous = vec![cancelled];

    let report = engine
        .compute_overview(&window(d(2024, 7, 1), d(2024, 7, 31), &current, &previous))
        .unwrap();
    assert_eq!(report.comparative.month_over_month.previous, Decimal::ZERO);
    assert_eq!(report.comparative.month_over_month.change, None);
}
