use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the analytics core.
///
/// Every value here is a fixed business constant with a mandatory default;
/// a configuration file only exists so the defaults are visible and
/// overridable without touching algorithm code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub availability: AvailabilityRules,
    pub finance: FinanceRules,
}

/// Tuning knobs for the free-range listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvailabilityRules {
    /// Free ranges shorter than this many nights are not worth marketing
    /// and are never surfaced, regardless of the property's minimum stay.
    pub significant_gap_nights: i64,

    /// Hard cap on the number of slots returned by a single listing call.
    pub max_slots: usize,
}

impl Default for AvailabilityRules {
    fn default() -> Self {
        Self {
            significant_gap_nights: 3,
            max_slots: 100,
        }
    }
}

/// Fixed financial constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinanceRules {
    /// Channel and collection commissions are stored net of VAT; the
    /// summed figure is grossed up once by this factor (21% VAT).
    pub commission_tax_factor: Decimal,
}

impl Default for FinanceRules {
    fn default() -> Self {
        Self {
            commission_tax_factor: dec!(1.21),
        }
    }
}
