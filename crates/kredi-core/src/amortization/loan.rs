//! Commercial loan payment plans under Turkish banking practice.
//!
//! Two repayment schemes are supported: equal principal (Eşit Ana Paralı)
//! and equal installment (Eşit Taksitli). Interest is simple interest per
//! period, BSMV is charged on every interest payment, and an optional
//! one-time commission is charged on the principal. All math uses
//! `rust_decimal::Decimal` with amounts rounded to kuruş at each step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::commission::{CommissionMode, CommissionPlan};
use super::{equal_installment, equal_principal, summary};
use crate::calendar::{CalendarEntry, CalendarRequest, HolidayCalendarKind, PaymentCalendar, MAX_INSTALLMENTS};
use crate::error::KrediError;
use crate::types::{with_metadata, AccrualBasis, ComputationOutput, Money, PaymentFrequency, Rate, Years};
use crate::KrediResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Statutory BSMV rate on loan interest.
pub const DEFAULT_BSMV_RATE: Rate = dec!(0.05);

/// Largest accepted loan amount (one quadrillion TL). Keeps every product
/// and sum in the schedule inside `Decimal` range.
pub const MAX_PRINCIPAL: Money = dec!(1000000000000000);

/// Largest accepted nominal annual rate (1000%).
pub const MAX_ANNUAL_RATE: Rate = dec!(10);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Repayment scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanScheme {
    /// Eşit Ana Paralı: constant principal, declining interest.
    EqualPrincipal,
    /// Eşit Taksitli: constant total installment (annuity).
    EqualInstallment,
}

impl LoanScheme {
    /// Turkish product name.
    pub fn label(self) -> &'static str {
        match self {
            LoanScheme::EqualPrincipal => "Eşit Ana Paralı Kredi",
            LoanScheme::EqualInstallment => "Eşit Taksitli Kredi",
        }
    }
}

/// A single loan calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Loan amount (TL).
    pub principal: Money,
    /// Nominal annual interest rate (0.30 = 30%).
    pub annual_rate: Rate,
    /// Number of installments.
    pub term: u32,
    pub scheme: LoanScheme,
    /// Loan disbursement date; interest accrues from here.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// BSMV rate applied to interest (and commission when enabled).
    #[serde(default = "default_bsmv_rate")]
    pub bsmv_rate: Rate,
    /// One-time commission as a fraction of principal.
    #[serde(default)]
    pub commission_rate: Rate,
    #[serde(default)]
    pub commission_mode: CommissionMode,
    #[serde(default = "default_true")]
    pub bsmv_on_commission: bool,
    #[serde(default)]
    pub accrual_basis: AccrualBasis,
    #[serde(default)]
    pub holidays: HolidayCalendarKind,
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

fn default_bsmv_rate() -> Rate {
    DEFAULT_BSMV_RATE
}

fn default_true() -> bool {
    true
}

impl LoanRequest {
    /// Request with the usual defaults: monthly, 5% BSMV, no commission,
    /// fixed accrual days and the Turkish holiday table.
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        term: u32,
        scheme: LoanScheme,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            term,
            scheme,
            start_date,
            frequency: PaymentFrequency::default(),
            bsmv_rate: DEFAULT_BSMV_RATE,
            commission_rate: Decimal::ZERO,
            commission_mode: CommissionMode::default(),
            bsmv_on_commission: true,
            accrual_basis: AccrualBasis::default(),
            holidays: HolidayCalendarKind::default(),
            extra_holidays: Vec::new(),
        }
    }

    /// Calendar inputs implied by this request.
    pub fn calendar_request(&self) -> CalendarRequest {
        CalendarRequest {
            start_date: self.start_date,
            installments: self.term,
            frequency: self.frequency,
            holidays: self.holidays,
            extra_holidays: self.extra_holidays.clone(),
        }
    }

    /// Periodic rate under the fixed 30/90/180-day convention.
    pub fn periodic_rate(&self) -> Rate {
        self.frequency.periodic_rate(self.annual_rate)
    }
}

/// One scheduled installment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub installment_number: u32,
    pub payment_date: NaiveDate,
    /// Days of interest charged for this period.
    pub accrual_days: u32,
    pub principal_payment: Money,
    pub interest_payment: Money,
    /// BSMV on interest plus BSMV on any amortized commission.
    pub bsmv: Money,
    pub commission_payment: Money,
    /// Total paid on this date.
    pub installment_amount: Money,
    /// Principal outstanding after this payment.
    pub remaining_principal: Money,
}

impl InstallmentRow {
    /// Build a row from its components; the total is derived, never passed in.
    pub(crate) fn assemble(
        entry: &CalendarEntry,
        accrual_days: u32,
        principal_payment: Money,
        interest_payment: Money,
        bsmv: Money,
        commission_payment: Money,
        remaining_principal: Money,
    ) -> Self {
        Self {
            installment_number: entry.installment_number,
            payment_date: entry.payment_date,
            accrual_days,
            principal_payment,
            interest_payment,
            bsmv,
            commission_payment,
            installment_amount: principal_payment + interest_payment + bsmv + commission_payment,
            remaining_principal,
        }
    }
}

/// Commission collected on the start date, outside the installment rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpfrontCharge {
    pub payment_date: NaiveDate,
    pub commission: Money,
    pub bsmv: Money,
    pub total: Money,
}

/// Aggregates over the whole plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_principal: Money,
    pub total_interest: Money,
    /// All BSMV, including tax on commission.
    pub total_bsmv: Money,
    /// Commission net of tax.
    pub total_commission: Money,
    /// Sum of installment amounts.
    pub total_installments: Money,
    /// Upfront charge including its tax.
    pub total_upfront: Money,
    /// Everything the borrower pays: installments + upfront charge.
    pub total_loan_cost: Money,
}

/// Borrowing cost indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostMetrics {
    /// Principal-weighted average time to repayment (Ortalama Vade).
    pub average_maturity_years: Years,
    /// (interest + BSMV + commission) / (average maturity × principal).
    pub all_in_rate: Rate,
    /// Annualised IRR of the borrower's cash flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_annual_rate: Option<Rate>,
}

/// Complete payment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub scheme: LoanScheme,
    pub principal: Money,
    /// Interest rate per period before tax.
    pub periodic_rate: Rate,
    /// Constant installment for the equal installment scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_installment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upfront_charge: Option<UpfrontCharge>,
    pub installments: Vec<InstallmentRow>,
    pub totals: ScheduleTotals,
    pub cost: CostMetrics,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full payment plan for a loan request.
pub fn calculate_schedule(request: &LoanRequest) -> KrediResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_request(request)?;

    let dates = PaymentCalendar::from_request(&request.calendar_request()).generate(request.term)?;
    let commission = CommissionPlan::new(request);

    let (installments, level_installment) = match request.scheme {
        LoanScheme::EqualPrincipal => (
            equal_principal::build_rows(request, &dates, &commission),
            None,
        ),
        LoanScheme::EqualInstallment => {
            if request.accrual_basis == AccrualBasis::Actual {
                warnings.push(
                    "Actual accrual days are not applicable to a level installment; \
                     using fixed 30/90/180-day periods"
                        .into(),
                );
            }
            let (rows, level) = equal_installment::build_rows(request, &dates, &commission)?;
            (rows, Some(level))
        }
    };

    let shifted = dates
        .iter()
        .filter(|e| e.payment_date != e.scheduled_date)
        .count();
    if shifted > 0 {
        warnings.push(format!(
            "{shifted} payment date(s) moved to the next business day"
        ));
    }

    let upfront_charge = commission.upfront_charge(request.start_date);
    let totals = summary::totals(&installments, upfront_charge.as_ref());
    let cost = summary::cost_metrics(request, &installments, &totals, &mut warnings);

    log::debug!(
        "{:?} schedule: {} installments, total cost {}",
        request.scheme,
        installments.len(),
        totals.total_loan_cost
    );

    let output = Schedule {
        scheme: request.scheme,
        principal: request.principal,
        periodic_rate: request.periodic_rate(),
        level_installment,
        upfront_charge,
        installments,
        totals,
        cost,
    };

    let methodology = match request.scheme {
        LoanScheme::EqualPrincipal => {
            "Eşit Ana Paralı Kredi: constant principal, simple periodic interest, BSMV on interest"
        }
        LoanScheme::EqualInstallment => {
            "Eşit Taksitli Kredi: annuity on the BSMV-inclusive periodic rate, final installment clears the balance"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": request.principal.to_string(),
            "annual_rate": request.annual_rate.to_string(),
            "term": request.term,
            "frequency": request.frequency,
            "bsmv_rate": request.bsmv_rate.to_string(),
            "commission_rate": request.commission_rate.to_string(),
            "commission_mode": request.commission_mode,
            "bsmv_on_commission": request.bsmv_on_commission,
            "accrual_basis": request.accrual_basis,
            "holidays": request.holidays,
            "start_date": request.start_date.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan_request(request: &LoanRequest) -> KrediResult<()> {
    if request.principal <= Decimal::ZERO {
        return Err(KrediError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if request.principal > MAX_PRINCIPAL {
        return Err(KrediError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal cannot exceed {MAX_PRINCIPAL}"),
        });
    }
    if request.term == 0 {
        return Err(KrediError::InvalidInput {
            field: "term".into(),
            reason: "Term must be at least 1 installment".into(),
        });
    }
    if request.term > MAX_INSTALLMENTS {
        return Err(KrediError::InvalidInput {
            field: "term".into(),
            reason: format!("Term cannot exceed {MAX_INSTALLMENTS} installments"),
        });
    }
    if request.annual_rate < Decimal::ZERO {
        return Err(KrediError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if request.annual_rate > MAX_ANNUAL_RATE {
        return Err(KrediError::InvalidInput {
            field: "annual_rate".into(),
            reason: format!("Annual rate cannot exceed {MAX_ANNUAL_RATE} (as a decimal)"),
        });
    }
    if request.bsmv_rate < Decimal::ZERO || request.bsmv_rate >= Decimal::ONE {
        return Err(KrediError::InvalidInput {
            field: "bsmv_rate".into(),
            reason: "BSMV rate must be between 0 and 1".into(),
        });
    }
    if request.commission_rate < Decimal::ZERO || request.commission_rate >= Decimal::ONE {
        return Err(KrediError::InvalidInput {
            field: "commission_rate".into(),
            reason: "Commission rate must be between 0 and 1".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
