use analytics::{OverviewEngine, OverviewInputs, OverviewMetrics};
use anyhow::Context;
use availability::AvailabilityEngine;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::{Expense, Payment, PropertyStaySettings, Reservation, normalize};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

/// The main entry point for the Stayview reporting façade.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = configuration::load_settings().context("Failed to load configuration")?;

    match cli.command {
        Commands::Overview(args) => handle_overview(args, settings).await,
        Commands::Availability(args) => handle_availability(args, settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Derived reporting over a reservation snapshot: availability listings and
/// business overview metrics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the business overview for a reporting window.
    Overview(OverviewArgs),
    /// List free-to-book ranges, or check one specific stay.
    Availability(AvailabilityArgs),
}

#[derive(Parser)]
struct OverviewArgs {
    /// Directory holding reservations.json, payments.json and expenses.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// First day of the reporting window (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the reporting window, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// Restrict the report to a single property.
    #[arg(long)]
    property: Option<Uuid>,

    /// Restrict the report to a single booking channel.
    #[arg(long)]
    channel: Option<String>,

    /// Emit the raw report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AvailabilityArgs {
    /// Directory holding reservations.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// The property whose calendar to inspect.
    #[arg(long)]
    property: Uuid,

    /// Start of the availability horizon (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// End of the availability horizon, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// Minimum bookable stay in nights.
    #[arg(long, default_value_t = 1)]
    min_stay: i64,

    /// Maximum bookable stay in nights.
    #[arg(long, default_value_t = 365)]
    max_stay: i64,

    /// Check one specific stay instead of listing ranges (needs --check-out).
    #[arg(long, requires = "check_out")]
    check_in: Option<NaiveDate>,

    /// Checkout day of the stay to check (exclusive).
    #[arg(long, requires = "check_in")]
    check_out: Option<NaiveDate>,
}

// ==============================================================================
// Overview Command Logic
// ==============================================================================

async fn handle_overview(args: OverviewArgs, settings: configuration::Settings) -> anyhow::Result<()> {
    // The three sources load concurrently, and one failure aborts the whole
    // report: partially-sourced metrics would be misleading.
    let (reservations, payments, expenses): (Vec<Reservation>, Vec<Payment>, Vec<Expense>) =
        futures::try_join!(
            load_records(args.data_dir.join("reservations.json")),
            load_records(args.data_dir.join("payments.json")),
            load_records(args.data_dir.join("expenses.json")),
        )?;

    let scoped: Vec<Reservation> = reservations
        .iter()
        .filter(|r| in_scope(r, args.property, args.channel.as_deref()))
        .cloned()
        .collect();

    let expenses: Vec<Expense> = expenses
        .into_iter()
        .filter(|e| args.property.is_none_or(|p| e.property_id == p))
        .filter(|e| {
            let day = normalize(e.date);
            day >= args.from && day <= args.to
        })
        .collect();

    let current: Vec<Reservation> = scoped
        .iter()
        .filter(|r| checked_in_between(r, args.from, args.to))
        .cloned()
        .collect();

    // The immediately preceding window of identical length, same scope.
    let days = (args.to - args.from).num_days() + 1;
    let prev_from = args.from - Duration::days(days);
    let prev_to = args.from - Duration::days(1);
    let previous: Vec<Reservation> = scoped
        .iter()
        .filter(|r| checked_in_between(r, prev_from, prev_to))
        .cloned()
        .collect();

    let property_count = match args.property {
        Some(_) => 1,
        None => {
            let distinct: HashSet<Uuid> = scoped.iter().map(|r| r.property_id).collect();
            distinct.len().max(1) as u32
        }
    };

    let engine = OverviewEngine::new(settings.finance);
    let report = engine.compute_overview(&OverviewInputs {
        from: args.from,
        to: args.to,
        property_count,
        reservations: Some(&current),
        payments: Some(&payments),
        expenses: Some(&expenses),
        previous_reservations: Some(&previous),
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_overview(&report);
    }
    Ok(())
}

fn render_overview(report: &OverviewMetrics) {
    println!(
        "Overview {} .. {} ({} days)",
        report.range.from, report.range.to, report.range.days
    );

    let mut finances = Table::new();
    finances.set_header(vec!["Revenue", "Commissions", "Received", "Pending", "Expenses", "Net income"]);
    finances.add_row(vec![
        report.finances.total_revenue.to_string(),
        report.finances.commissions.to_string(),
        report.finances.payments_received.to_string(),
        report.finances.payments_pending.to_string(),
        report.finances.expenses.to_string(),
        report.finances.net_income.to_string(),
    ]);
    println!("{finances}");

    let mut operations = Table::new();
    operations.set_header(vec!["Nights avail.", "Nights booked", "Occupancy %", "ADR", "RevPAR", "Avg stay"]);
    operations.add_row(vec![
        report.operations.nights_available.to_string(),
        report.operations.nights_booked.to_string(),
        report.operations.occupancy_rate.to_string(),
        report.operations.adr.to_string(),
        report.operations.rev_par.to_string(),
        report.operations.average_stay.to_string(),
    ]);
    println!("{operations}");

    let mut channels = Table::new();
    channels.set_header(vec!["Channel", "Reservations", "Revenue"]);
    for channel in &report.bookings.by_channel {
        channels.add_row(vec![
            channel.channel.clone(),
            channel.reservations.to_string(),
            channel.revenue.to_string(),
        ]);
    }
    println!("{channels}");

    println!(
        "Bookings: {} total, {} cancelled ({}%) | Guests: {} new, {} returning (repeat {}%)",
        report.bookings.total,
        report.bookings.cancelled,
        report.bookings.cancellation_rate,
        report.guests.new_guests,
        report.guests.returning_guests,
        report.guests.repeat_rate,
    );

    match &report.comparative.month_over_month.change {
        Some(change) => println!(
            "vs previous window: {} -> {} ({change}%)",
            report.comparative.month_over_month.previous,
            report.comparative.month_over_month.current,
        ),
        None => println!("vs previous window: no baseline"),
    }
}

// ==============================================================================
// Availability Command Logic
// ==============================================================================

async fn handle_availability(
    args: AvailabilityArgs,
    settings: configuration::Settings,
) -> anyhow::Result<()> {
    let reservations: Vec<Reservation> =
        load_records(args.data_dir.join("reservations.json")).await?;
    let scoped: Vec<Reservation> = reservations
        .into_iter()
        .filter(|r| r.property_id == args.property)
        .collect();

    let stay_settings = PropertyStaySettings {
        min_stay: args.min_stay,
        max_stay: args.max_stay,
        check_in_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default(),
        check_out_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default(),
    };
    let engine = AvailabilityEngine::new(settings.availability);

    if let (Some(check_in), Some(check_out)) = (args.check_in, args.check_out) {
        let check = engine.check_availability(&scoped, &stay_settings, check_in, check_out)?;
        match (&check.reason, check.is_available) {
            (_, true) => println!("Available: {} nights", check.nights),
            (Some(reason), false) => {
                println!("Not available: {reason}");
                for conflict in &check.conflicts {
                    println!(
                        "  conflicts with {} .. {} ({})",
                        conflict.check_in,
                        conflict.check_out,
                        conflict.guest.as_deref().unwrap_or("unknown guest"),
                    );
                }
            }
            _ => unreachable!("unavailable results always carry a reason"),
        }
        return Ok(());
    }

    // The clock lives here, not in the engine.
    let today = Utc::now().date_naive();
    let slots = engine.compute_free_ranges(&scoped, &stay_settings, args.from, args.to, today)?;

    if slots.is_empty() {
        println!("No marketable free ranges in {} .. {}", args.from, args.to);
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["From", "To", "Nights", "Status"]);
    for slot in &slots {
        table.add_row(vec![
            slot.start_date.to_string(),
            slot.end_date.to_string(),
            slot.nights.to_string(),
            slot.reason.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Snapshot Loading
// ==============================================================================

/// Reads one JSON snapshot file into a typed collection.
async fn load_records<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let records = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    Ok(records)
}

fn in_scope(reservation: &Reservation, property: Option<Uuid>, channel: Option<&str>) -> bool {
    if let Some(property) = property {
        if reservation.property_id != property {
            return false;
        }
    }
    if let Some(channel) = channel {
        let name = reservation.channel_name.as_deref().unwrap_or("").trim();
        if !name.eq_ignore_ascii_case(channel.trim()) {
            return false;
        }
    }
    true
}

/// Window scoping by normalized check-in date, inclusive on both ends.
fn checked_in_between(reservation: &Reservation, from: NaiveDate, to: NaiveDate) -> bool {
    match reservation.check_in {
        Some(check_in) => {
            let day = normalize(check_in);
            day >= from && day <= to
        }
        None => false,
    }
}
