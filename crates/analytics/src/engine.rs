use crate::error::AnalyticsError;
use crate::report::{
    Bookings, ChannelBreakdown, Comparative, Finances, Guests, MonthOverMonth, MonthlyRevenue,
    Operations, OverviewMetrics, PropertyRevenue, ReportRange,
};
use chrono::NaiveDate;
use configuration::FinanceRules;
use core_types::{CoreError, Expense, Payment, PaymentStatus, Reservation, normalize};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// The window-scoped snapshot a single overview computation runs on.
///
/// The query layer assembles the three collections concurrently; a field
/// left as `None` means its fetch never delivered, and the engine refuses
/// to compute rather than substitute an empty list. `previous_reservations`
/// is the same reservation scope re-queried for the immediately preceding
/// window of equal length.
#[derive(Debug, Clone, Copy)]
pub struct OverviewInputs<'a> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Number of distinct properties in scope (1 when a single property is
    /// selected).
    pub property_count: u32,
    pub reservations: Option<&'a [Reservation]>,
    pub payments: Option<&'a [Payment]>,
    pub expenses: Option<&'a [Expense]>,
    pub previous_reservations: Option<&'a [Reservation]>,
}

/// A stateless calculator for the overview report.
#[derive(Debug, Clone, Default)]
pub struct OverviewEngine {
    rules: FinanceRules,
}

impl OverviewEngine {
    pub fn new(rules: FinanceRules) -> Self {
        Self { rules }
    }

    /// The main entry point for computing the overview metrics.
    ///
    /// Fails on a reversed reporting window or a missing input collection;
    /// everything else is a legal (possibly zeroed) report. Monetary values
    /// and rates are rounded to two decimals here and nowhere else.
    pub fn compute_overview(
        &self,
        inputs: &OverviewInputs<'_>,
    ) -> Result<OverviewMetrics, AnalyticsError> {
        if inputs.to < inputs.from {
            return Err(AnalyticsError::InvalidWindow(CoreError::InvalidRange {
                check_in: inputs.from,
                check_out: inputs.to,
            }));
        }
        let reservations = inputs
            .reservations
            .ok_or(AnalyticsError::MissingData("reservations"))?;
        let payments = inputs
            .payments
            .ok_or(AnalyticsError::MissingData("payments"))?;
        let expenses = inputs
            .expenses
            .ok_or(AnalyticsError::MissingData("expenses"))?;
        let previous = inputs
            .previous_reservations
            .ok_or(AnalyticsError::MissingData("previous_reservations"))?;

        let days = ((inputs.to - inputs.from).num_days() + 1).max(1);
        let valid: Vec<&Reservation> = reservations.iter().filter(|r| r.status.is_active()).collect();

        let total_revenue: Decimal = valid.iter().map(|r| r.total_amount).sum();

        let finances = self.finances(reservations, &valid, payments, expenses, total_revenue);
        let operations = operations(&valid, inputs.property_count, days, total_revenue);
        let bookings = bookings(reservations, &valid);
        let guests = guests(&valid);
        let trend = trend(&valid);
        let comparative = comparative(&valid, previous, total_revenue);

        debug!(
            reservations = reservations.len(),
            valid = valid.len(),
            days,
            "computed overview"
        );

        Ok(OverviewMetrics {
            range: ReportRange {
                from: inputs.from,
                to: inputs.to,
                days,
            },
            finances,
            operations,
            bookings,
            guests,
            trend,
            comparative,
        })
    }

    fn finances(
        &self,
        reservations: &[Reservation],
        valid: &[&Reservation],
        payments: &[Payment],
        expenses: &[Expense],
        total_revenue: Decimal,
    ) -> Finances {
        // Commissions are summed net first; the VAT gross-up is applied
        // exactly once to the total, never per reservation.
        let commissions_net: Decimal = valid
            .iter()
            .map(|r| r.channel_commission + r.collection_commission)
            .sum();
        let commissions = commissions_net * self.rules.commission_tax_factor;

        // Payments count only when they belong to a reservation inside
        // this window.
        let window_ids: HashSet<_> = reservations.iter().map(|r| r.id).collect();
        let mut payments_received = Decimal::ZERO;
        let mut payments_pending = Decimal::ZERO;
        for payment in payments {
            if !window_ids.contains(&payment.reservation_id) {
                continue;
            }
            match payment.status {
                PaymentStatus::Completed => payments_received += payment.amount,
                PaymentStatus::Pending => payments_pending += payment.amount,
            }
        }

        // Expense amounts arrive with inconsistent signs; aggregate the
        // magnitude.
        let expense_total: Decimal = expenses
            .iter()
            .filter(|e| e.status.is_chargeable())
            .map(|e| e.amount.abs())
            .sum();

        let net_income = total_revenue - expense_total - commissions;

        Finances {
            total_revenue: total_revenue.round_dp(2),
            commissions: commissions.round_dp(2),
            payments_received: payments_received.round_dp(2),
            payments_pending: payments_pending.round_dp(2),
            expenses: expense_total.round_dp(2),
            net_income: net_income.round_dp(2),
        }
    }
}

fn operations(
    valid: &[&Reservation],
    property_count: u32,
    days: i64,
    total_revenue: Decimal,
) -> Operations {
    let nights_available = i64::from(property_count) * days;
    // Records without a well-formed date range contribute revenue but no
    // nights; that asymmetry is deliberate.
    let nights_booked: i64 = valid.iter().filter_map(|r| r.effective_nights()).sum();

    let occupancy_rate = if nights_available > 0 {
        Decimal::from(nights_booked) / Decimal::from(nights_available) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let adr = if valid.is_empty() {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(valid.len() as u64)
    };
    let rev_par = if nights_available > 0 {
        total_revenue / Decimal::from(nights_available)
    } else {
        Decimal::ZERO
    };
    let average_stay = if valid.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(nights_booked) / Decimal::from(valid.len() as u64)
    };

    Operations {
        nights_available,
        nights_booked,
        occupancy_rate: occupancy_rate.round_dp(2),
        adr: adr.round_dp(2),
        rev_par: rev_par.round_dp(2),
        average_stay: average_stay.round_dp(2),
    }
}

fn bookings(reservations: &[Reservation], valid: &[&Reservation]) -> Bookings {
    let total = reservations.len();
    let cancelled = total - valid.len();
    let cancellation_rate = if total > 0 {
        Decimal::from(cancelled as u64) / Decimal::from(total as u64) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let mut by_channel: HashMap<String, (usize, Decimal)> = HashMap::new();
    for reservation in valid {
        let label = channel_label(reservation.channel_name.as_deref());
        let entry = by_channel.entry(label).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += reservation.total_amount;
    }
    let mut by_channel: Vec<ChannelBreakdown> = by_channel
        .into_iter()
        .map(|(channel, (reservations, revenue))| ChannelBreakdown {
            channel,
            reservations,
            revenue: revenue.round_dp(2),
        })
        .collect();
    // Deterministic output order for rendering and golden tests.
    by_channel.sort_by(|a, b| a.channel.cmp(&b.channel));

    Bookings {
        total,
        cancelled,
        cancellation_rate: cancellation_rate.round_dp(2),
        by_channel,
    }
}

/// Trims and title-cases a raw channel name; absent or blank names group
/// under "Unknown".
fn channel_label(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return "Unknown".to_string();
    }
    trimmed
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn guests(valid: &[&Reservation]) -> Guests {
    // Chronological order decides which occurrence of a repeat guest is
    // "new": an out-of-order walk would flag the wrong one.
    let mut ordered: Vec<&Reservation> = valid.to_vec();
    ordered.sort_by_key(|r| r.check_in.map(normalize));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut new_guests = 0usize;
    let mut returning_guests = 0usize;
    for reservation in ordered {
        match reservation.guest_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                if seen.insert(email) {
                    new_guests += 1;
                } else {
                    returning_guests += 1;
                }
            }
            // Anonymous bookings always count as new.
            _ => new_guests += 1,
        }
    }

    let processed = new_guests + returning_guests;
    let repeat_rate = if processed > 0 {
        Decimal::from(returning_guests as u64) / Decimal::from(processed as u64)
            * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    Guests {
        new_guests,
        returning_guests,
        repeat_rate: repeat_rate.round_dp(2),
    }
}

fn trend(valid: &[&Reservation]) -> Vec<MonthlyRevenue> {
    // BTreeMap keeps the `yyyy-MM` keys in lexicographic order, which is
    // chronological order for this format.
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for reservation in valid {
        let Some(check_in) = reservation.check_in else {
            continue;
        };
        let month = normalize(check_in).format("%Y-%m").to_string();
        *buckets.entry(month).or_insert(Decimal::ZERO) += reservation.total_amount;
    }
    buckets
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue {
            month,
            revenue: revenue.round_dp(2),
        })
        .collect()
}

fn comparative(
    valid: &[&Reservation],
    previous: &[Reservation],
    total_revenue: Decimal,
) -> Comparative {
    let mut by_property: HashMap<uuid::Uuid, Decimal> = HashMap::new();
    for reservation in valid {
        *by_property
            .entry(reservation.property_id)
            .or_insert(Decimal::ZERO) += reservation.total_amount;
    }
    let mut revenue_by_property: Vec<PropertyRevenue> = by_property
        .into_iter()
        .map(|(property_id, revenue)| PropertyRevenue {
            property_id,
            revenue: revenue.round_dp(2),
        })
        .collect();
    revenue_by_property.sort_by_key(|p| p.property_id);

    let previous_revenue: Decimal = previous
        .iter()
        .filter(|r| r.status.is_active())
        .map(|r| r.total_amount)
        .sum();
    // No baseline means no comparison, which is not the same as 0% change.
    let change = if previous_revenue > Decimal::ZERO {
        Some(
            ((total_revenue - previous_revenue) / previous_revenue * Decimal::ONE_HUNDRED)
                .round_dp(2),
        )
    } else {
        None
    };

    Comparative {
        revenue_by_property,
        month_over_month: MonthOverMonth {
            current: total_revenue.round_dp(2),
            previous: previous_revenue.round_dp(2),
            change,
        },
    }
}
