use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl ReservationStatus {
    /// Returns true for reservations that count towards revenue and
    /// occupancy. Cancelled stays are excluded from every aggregate.
    pub fn is_active(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ExpenseStatus {
    /// Pending and completed expenses both reduce net income; cancelled
    /// ones are ignored.
    pub fn is_chargeable(&self) -> bool {
        !matches!(self, ExpenseStatus::Cancelled)
    }
}
