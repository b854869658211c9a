use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contiguous free date range worth marketing.
///
/// `start_date` and `end_date` are both free days (inclusive range);
/// `nights` is the integer day difference between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: i64,
    pub is_available: bool,
    pub reason: Option<String>,
}

/// Why a specific stay request cannot be booked.
///
/// This is a business outcome, not an error: the computation succeeded and
/// determined the answer is "no".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The requested stay is shorter than the property's minimum.
    MinStay { min_stay: i64 },
    /// The requested stay is longer than the property's maximum.
    MaxStay { max_stay: i64 },
    /// The requested range overlaps at least one existing stay.
    Occupied,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::MinStay { min_stay } => {
                write!(f, "Minimum stay is {min_stay} nights")
            }
            UnavailableReason::MaxStay { max_stay } => {
                write!(f, "Maximum stay is {max_stay} nights")
            }
            UnavailableReason::Occupied => write!(f, "Occupied"),
        }
    }
}

/// An existing stay that blocks a requested range, for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayConflict {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest: Option<String>,
}

/// The result of a point query for one specific check-in/checkout pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    pub is_available: bool,
    pub nights: i64,
    pub reason: Option<UnavailableReason>,
    pub conflicts: Vec<StayConflict>,
}

impl AvailabilityCheck {
    pub fn available(nights: i64) -> Self {
        Self {
            is_available: true,
            nights,
            reason: None,
            conflicts: Vec::new(),
        }
    }

    pub fn unavailable(nights: i64, reason: UnavailableReason, conflicts: Vec<StayConflict>) -> Self {
        Self {
            is_available: false,
            nights,
            reason: Some(reason),
            conflicts,
        }
    }
}
