//! # Stayview Overview Analytics
//!
//! This crate turns a window-scoped snapshot of reservations, payments and
//! expenses into the aggregate business report shown on the console's
//! overview page: finances, occupancy, booking channels, guest loyalty,
//! revenue trend, and a comparison against the immediately preceding window.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems; scoping the inputs to a tenant, property, channel and
//!   window is the query layer's job.
//! - **Stateless Calculation:** The `OverviewEngine` is a stateless
//!   calculator. The same inputs always produce the same
//!   [`OverviewMetrics`], and nothing is persisted.
//! - **All or nothing:** A missing input collection fails the whole
//!   computation. A silently-zeroed expense list would misreport net income
//!   as inflated, which is worse than no report at all.

pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{OverviewEngine, OverviewInputs};
pub use error::AnalyticsError;
pub use report::OverviewMetrics;
