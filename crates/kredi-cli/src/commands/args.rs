//! Flag types shared by the `plan` and `calendar` commands.

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use kredi_core::amortization::{CommissionMode, LoanScheme};
use kredi_core::calendar::HolidayCalendarKind;
use kredi_core::{AccrualBasis, PaymentFrequency};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    /// Eşit Ana Paralı
    EqualPrincipal,
    /// Eşit Taksitli
    EqualInstallment,
}

impl From<SchemeArg> for LoanScheme {
    fn from(value: SchemeArg) -> Self {
        match value {
            SchemeArg::EqualPrincipal => LoanScheme::EqualPrincipal,
            SchemeArg::EqualInstallment => LoanScheme::EqualInstallment,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    #[value(alias = "1m")]
    Monthly,
    #[value(alias = "3m")]
    Quarterly,
    #[value(alias = "6m")]
    SemiAnnual,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Quarterly => PaymentFrequency::Quarterly,
            FrequencyArg::SemiAnnual => PaymentFrequency::SemiAnnual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HolidaysArg {
    Turkey,
    WeekendsOnly,
}

impl From<HolidaysArg> for HolidayCalendarKind {
    fn from(value: HolidaysArg) -> Self {
        match value {
            HolidaysArg::Turkey => HolidayCalendarKind::Turkey,
            HolidaysArg::WeekendsOnly => HolidayCalendarKind::WeekendsOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AccrualArg {
    /// 30/90/180 days per period (Sabit)
    Fixed,
    /// Calendar days between payments (Değişken)
    Actual,
}

impl From<AccrualArg> for AccrualBasis {
    fn from(value: AccrualArg) -> Self {
        match value {
            AccrualArg::Fixed => AccrualBasis::Fixed,
            AccrualArg::Actual => AccrualBasis::Actual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CommissionModeArg {
    Upfront,
    Amortized,
}

impl From<CommissionModeArg> for CommissionMode {
    fn from(value: CommissionModeArg) -> Self {
        match value {
            CommissionModeArg::Upfront => CommissionMode::Upfront,
            CommissionModeArg::Amortized => CommissionMode::Amortized,
        }
    }
}

/// Payment date options
#[derive(Args)]
pub struct DateArgs {
    /// Loan start date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Holiday table used to roll payment dates forward
    #[arg(long, value_enum, default_value = "turkey")]
    pub holidays: HolidaysArg,

    /// Additional non-business day, YYYY-MM-DD (repeatable)
    #[arg(long = "holiday")]
    pub extra_holidays: Vec<NaiveDate>,
}

impl DateArgs {
    pub fn start_date_or_today(&self) -> NaiveDate {
        self.start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
