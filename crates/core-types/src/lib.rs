//! # Stayview Core Types
//!
//! This crate defines the shared vocabulary of the reservation analytics
//! system: the raw records handed over by the query layer (reservations,
//! payments, expenses, per-property stay settings) and the Interval Model,
//! the single source of truth for date-range arithmetic.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of the engines built on top of
//!   it. It depends only on foundational libraries (chrono, rust_decimal,
//!   serde, uuid).
//! - **Immutable snapshots:** Every record here is constructed from a query
//!   result, consumed by an engine, and discarded. Nothing is mutated after
//!   construction and nothing is persisted.
//! - **One overlap predicate:** Both engines must go through
//!   [`DateInterval`] for half-open interval semantics so that off-by-one
//!   bugs cannot diverge between them.

pub mod enums;
pub mod error;
pub mod interval;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExpenseStatus, PaymentStatus, ReservationStatus};
pub use error::CoreError;
pub use interval::{DateInterval, nights, normalize};
pub use structs::{Expense, Payment, PropertyStaySettings, Reservation};
