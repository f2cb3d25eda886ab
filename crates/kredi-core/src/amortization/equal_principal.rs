//! Eşit Ana Paralı: the principal is repaid in equal parts and interest is
//! charged on the declining balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::commission::CommissionPlan;
use super::loan::{InstallmentRow, LoanRequest};
use crate::calendar::CalendarEntry;
use crate::types::{round_money, AccrualBasis, Money, Rate};

/// Day-count denominator for actual accrual (30 days × 12 months).
const BANK_YEAR_DAYS: Decimal = dec!(360);

/// Interest rate and day count for one period.
fn period_rate(request: &LoanRequest, entry: &CalendarEntry) -> (Rate, u32) {
    match request.accrual_basis {
        AccrualBasis::Fixed => (request.periodic_rate(), entry.fixed_accrual_days),
        AccrualBasis::Actual => (
            request.annual_rate * Decimal::from(entry.actual_accrual_days) / BANK_YEAR_DAYS,
            entry.actual_accrual_days,
        ),
    }
}

pub(crate) fn build_rows(
    request: &LoanRequest,
    dates: &[CalendarEntry],
    commission: &CommissionPlan,
) -> Vec<InstallmentRow> {
    let n = dates.len() as u32;
    let fixed_principal: Money = round_money(request.principal / Decimal::from(n.max(1)));

    let mut rows = Vec::with_capacity(dates.len());
    let mut balance = request.principal;

    for entry in dates {
        let (rate, accrual_days) = period_rate(request, entry);

        let interest = round_money(balance * rate);
        let interest_bsmv = round_money(interest * request.bsmv_rate);

        // The final installment clears whatever rounding left behind.
        let principal_payment = if entry.installment_number == n {
            balance
        } else {
            fixed_principal.min(balance)
        };

        let (commission_payment, commission_bsmv) = commission.portion(entry.installment_number);
        balance -= principal_payment;

        rows.push(InstallmentRow::assemble(
            entry,
            accrual_days,
            principal_payment,
            interest,
            interest_bsmv + commission_bsmv,
            commission_payment,
            balance,
        ));
    }

    rows
}
