//! # Stayview Availability Engine
//!
//! This crate answers two questions about a single property's calendar:
//!
//! - `compute_free_ranges`: which contiguous, marketable date ranges are
//!   still free to book over a horizon?
//! - `check_availability`: is one specific check-in/checkout request
//!   bookable right now?
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems and depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `AvailabilityEngine` holds nothing but
//!   its tuning rules. "Today" is an explicit parameter, never read from a
//!   clock, so every computation is deterministic and testable.
//!
//! The two operations are deliberately asymmetric: the range listing hides
//! fragments below the significant-gap threshold because they are not worth
//! marketing, while the point query approves any request that satisfies the
//! stay-length rules and conflicts with nothing.

pub mod engine;
pub mod error;
pub mod slot;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AvailabilityEngine;
pub use error::AvailabilityError;
pub use slot::{AvailabilityCheck, AvailabilitySlot, StayConflict, UnavailableReason};
