use std::time::Instant;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::holidays::{BusinessCalendar, HolidayCalendar, HolidayCalendarKind};
use crate::error::KrediError;
use crate::types::{with_metadata, ComputationOutput, PaymentFrequency};
use crate::KrediResult;

/// Upper bound on installments; longer plans are rejected as unrealistic.
pub const MAX_INSTALLMENTS: u32 = 600;

/// Inputs needed to lay out payment dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRequest {
    /// Loan disbursement date; interest accrues from here.
    pub start_date: NaiveDate,
    /// Number of installments.
    pub installments: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub holidays: HolidayCalendarKind,
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

/// One installment's dates and accrual window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub installment_number: u32,
    /// Same day of month as the start date, before business-day adjustment.
    pub scheduled_date: NaiveDate,
    /// Business-day adjusted due date.
    pub payment_date: NaiveDate,
    /// First day on which interest accrues for this installment.
    pub accrual_start: NaiveDate,
    /// Last accrual day (the day before `payment_date`).
    pub accrual_end: NaiveDate,
    pub actual_accrual_days: u32,
    pub fixed_accrual_days: u32,
}

/// Payment date generator bound to a business calendar.
pub struct PaymentCalendar<C: HolidayCalendar = BusinessCalendar> {
    start_date: NaiveDate,
    frequency: PaymentFrequency,
    calendar: C,
}

impl PaymentCalendar<BusinessCalendar> {
    pub fn from_request(request: &CalendarRequest) -> Self {
        Self::new(
            request.start_date,
            request.frequency,
            BusinessCalendar::new(request.holidays, &request.extra_holidays),
        )
    }
}

impl<C: HolidayCalendar> PaymentCalendar<C> {
    pub fn new(start_date: NaiveDate, frequency: PaymentFrequency, calendar: C) -> Self {
        Self {
            start_date,
            frequency,
            calendar,
        }
    }

    /// Nominal (unadjusted) date of installment `k`.
    ///
    /// Offsets are always taken from the start date so a month-end clamp
    /// (31 Jan -> 28 Feb) does not drift into later months.
    pub fn scheduled_date(&self, k: u32) -> KrediResult<NaiveDate> {
        let months = k
            .checked_mul(self.frequency.months())
            .ok_or_else(|| KrediError::DateError(format!("installment {k} is out of range")))?;
        self.start_date
            .checked_add_months(Months::new(months))
            .ok_or_else(|| {
                KrediError::DateError(format!(
                    "cannot add {months} months to {}",
                    self.start_date
                ))
            })
    }

    /// Lay out `installments` payment dates.
    pub fn generate(&self, installments: u32) -> KrediResult<Vec<CalendarEntry>> {
        let mut entries = Vec::with_capacity(installments as usize);
        let mut accrual_start = self.start_date;

        for k in 1..=installments {
            let scheduled_date = self.scheduled_date(k)?;
            let payment_date = self.calendar.next_business_day(scheduled_date)?;
            let days = (payment_date - accrual_start).num_days();
            if days <= 0 {
                return Err(KrediError::DateError(format!(
                    "installment {k} falls on {payment_date}, not after {accrual_start}"
                )));
            }
            let accrual_end = payment_date
                .checked_sub_days(Days::new(1))
                .ok_or_else(|| KrediError::DateError(format!("no day before {payment_date}")))?;

            entries.push(CalendarEntry {
                installment_number: k,
                scheduled_date,
                payment_date,
                accrual_start,
                accrual_end,
                actual_accrual_days: days as u32,
                fixed_accrual_days: self.frequency.fixed_days(),
            });

            accrual_start = payment_date;
        }

        log::debug!(
            "generated {} payment dates from {} ({:?})",
            entries.len(),
            self.start_date,
            self.frequency
        );
        Ok(entries)
    }
}

/// Generate the payment calendar for a loan without computing amounts.
pub fn generate_payment_calendar(
    request: &CalendarRequest,
) -> KrediResult<ComputationOutput<Vec<CalendarEntry>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_calendar_request(request)?;

    let calendar = PaymentCalendar::from_request(request);
    let entries = calendar.generate(request.installments)?;

    let shifted = entries
        .iter()
        .filter(|e| e.payment_date != e.scheduled_date)
        .count();
    if shifted > 0 {
        warnings.push(format!(
            "{shifted} payment date(s) moved to the next business day"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment calendar: same day each period, rolled forward over weekends and holidays",
        &serde_json::json!({
            "start_date": request.start_date.to_string(),
            "installments": request.installments,
            "frequency": request.frequency,
            "holidays": request.holidays,
            "extra_holidays": request.extra_holidays.len(),
        }),
        warnings,
        elapsed,
        entries,
    ))
}

pub(crate) fn validate_calendar_request(request: &CalendarRequest) -> KrediResult<()> {
    if request.installments == 0 {
        return Err(KrediError::InvalidInput {
            field: "term".into(),
            reason: "Term must be at least 1 installment".into(),
        });
    }
    if request.installments > MAX_INSTALLMENTS {
        return Err(KrediError::InvalidInput {
            field: "term".into(),
            reason: format!("Term cannot exceed {MAX_INSTALLMENTS} installments"),
        });
    }
    Ok(())
}
