use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The full overview report: the final output of the `OverviewEngine` and
/// the data transfer object for the reporting façade.
///
/// Every monetary figure and percentage in this tree is rounded to two
/// decimal places at assembly time; the engine never rounds intermediate
/// sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    pub range: ReportRange,
    pub finances: Finances,
    pub operations: Operations,
    pub bookings: Bookings,
    pub guests: Guests,
    pub trend: Vec<MonthlyRevenue>,
    pub comparative: Comparative,
}

/// The reporting window the metrics were computed over (inclusive dates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finances {
    pub total_revenue: Decimal,
    /// Channel + collection commissions, grossed up once by the VAT factor.
    pub commissions: Decimal,
    pub payments_received: Decimal,
    pub payments_pending: Decimal,
    pub expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operations {
    pub nights_available: i64,
    pub nights_booked: i64,
    pub occupancy_rate: Decimal,
    /// Average daily rate: revenue per reservation.
    pub adr: Decimal,
    /// Revenue per available night across the scoped properties.
    pub rev_par: Decimal,
    pub average_stay: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookings {
    pub total: usize,
    pub cancelled: usize,
    pub cancellation_rate: Decimal,
    pub by_channel: Vec<ChannelBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBreakdown {
    pub channel: String,
    pub reservations: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guests {
    pub new_guests: usize,
    pub returning_guests: usize,
    pub repeat_rate: Decimal,
}

/// One month's revenue bucket, keyed `yyyy-MM` so lexicographic order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparative {
    pub revenue_by_property: Vec<PropertyRevenue>,
    pub month_over_month: MonthOverMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRevenue {
    pub property_id: Uuid,
    pub revenue: Decimal,
}

/// Comparison against the immediately preceding window of equal length.
///
/// `change` is `None` when the prior window has no revenue baseline; that
/// is a different statement than a 0% change and callers must render it as
/// "no comparison available".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverMonth {
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Option<Decimal>,
}
