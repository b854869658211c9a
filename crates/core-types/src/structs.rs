use crate::enums::{ExpenseStatus, PaymentStatus, ReservationStatus};
use crate::interval::DateInterval;
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A booked stay as handed over by the query layer.
///
/// The dates are optional because upstream records are occasionally
/// incomplete: a reservation missing either date is excluded from every
/// interval-based aggregate (nights, occupancy, availability) but, when
/// non-cancelled, its `total_amount` still counts towards revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub property_id: Uuid,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    pub total_amount: Decimal,
    pub channel_commission: Decimal,
    pub collection_commission: Decimal,
    /// Stored night count from the source system. Advisory only: when it
    /// disagrees with the Interval Model, the computed value wins.
    pub nights: Option<i64>,
    pub guest_email: Option<String>,
    pub channel_name: Option<String>,
}

impl Reservation {
    /// The occupied date range of this stay, if the record carries both
    /// dates and they are well-ordered. Malformed records yield `None`
    /// rather than an error: a bad stored range excludes the record from
    /// interval aggregates but must not abort a whole report.
    pub fn interval(&self) -> Option<DateInterval> {
        let (check_in, check_out) = (self.check_in?, self.check_out?);
        DateInterval::from_timestamps(check_in, check_out).ok()
    }

    /// Night count for aggregation: the Interval Model's computation,
    /// with the stored value accepted only when it agrees.
    pub fn effective_nights(&self) -> Option<i64> {
        let computed = self.interval()?.nights();
        match self.nights {
            Some(stored) if stored == computed => Some(stored),
            _ => Some(computed),
        }
    }
}

/// A payment against a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub date: DateTime<Utc>,
}

/// A property expense, optionally linked to a specific stay.
///
/// `amount` may arrive with either sign; aggregation always takes the
/// absolute magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub property_id: Uuid,
    pub amount: Decimal,
    pub status: ExpenseStatus,
    pub date: DateTime<Utc>,
    pub reservation_id: Option<Uuid>,
}

/// Per-property stay constraints used by the availability engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyStaySettings {
    pub min_stay: i64,
    pub max_stay: i64,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
}
