use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Number of decimal places kept on every monetary amount (kuruş).
pub const MONEY_DP: u32 = 2;

/// Round a monetary amount to kuruş, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// How often installments fall due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// Every month ("1m")
    #[default]
    #[serde(alias = "1m")]
    Monthly,
    /// Every three months ("3m")
    #[serde(alias = "3m")]
    Quarterly,
    /// Every six months ("6m")
    #[serde(alias = "6m")]
    SemiAnnual,
}

impl PaymentFrequency {
    /// Calendar months between two installments.
    pub fn months(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 1,
            PaymentFrequency::Quarterly => 3,
            PaymentFrequency::SemiAnnual => 6,
        }
    }

    /// Banking-convention accrual days for one period (30/90/180).
    pub fn fixed_days(self) -> u32 {
        self.months() * 30
    }

    /// Number of periods in a year.
    pub fn periods_per_year(self) -> u32 {
        12 / self.months()
    }

    /// Periodic rate under the fixed 30-day-month convention.
    pub fn periodic_rate(self, annual_rate: Rate) -> Rate {
        annual_rate * Decimal::from(self.months()) / Decimal::from(12)
    }
}

/// Day count used for interest accrual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualBasis {
    /// 30/90/180 days per period regardless of the calendar.
    #[default]
    Fixed,
    /// Calendar days between consecutive payment dates, on a 360-day year.
    Actual,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
