//! Eşit Taksitli: every installment carries the same total. BSMV is folded
//! into the annuity rate so the level payment already covers the tax on
//! each period's interest.

use rust_decimal::Decimal;

use super::commission::CommissionPlan;
use super::loan::{InstallmentRow, LoanRequest};
use crate::calendar::CalendarEntry;
use crate::time_value::level_payment;
use crate::types::{round_money, Money, Rate};
use crate::KrediResult;

/// Periodic rate grossed up by BSMV: `r' = r × (1 + bsmv)`.
pub fn tax_inclusive_rate(periodic_rate: Rate, bsmv_rate: Rate) -> Rate {
    periodic_rate * (Decimal::ONE + bsmv_rate)
}

/// Constant installment before any amortized commission.
pub fn level_installment(request: &LoanRequest) -> KrediResult<Money> {
    let rate = tax_inclusive_rate(request.periodic_rate(), request.bsmv_rate);
    Ok(round_money(level_payment(rate, request.term, request.principal)?))
}

/// Annuity factors `a_m = (1 - v^m) / r'` for `m = 0..=n`, or `a_m = m` at a
/// zero rate.
fn annuity_factors(rate: Rate, n: u32) -> Vec<Decimal> {
    if rate.is_zero() {
        return (0..=n).map(Decimal::from).collect();
    }
    let v = Decimal::ONE / (Decimal::ONE + rate);
    let mut discount = Decimal::ONE;
    let mut factors = Vec::with_capacity(n as usize + 1);
    for _ in 0..=n {
        factors.push((Decimal::ONE - discount) / rate);
        discount *= v;
    }
    factors
}

/// Rows follow the exact annuity balance `B_k = P × a_{n-k} / a_n`.
///
/// Only reported figures are rounded: interest and BSMV per period and the
/// remaining principal. Each principal payment is the drop in the rounded
/// balance, so the portions sum to the loan amount and rounding never
/// compounds across periods, however long the term.
pub(crate) fn build_rows(
    request: &LoanRequest,
    dates: &[CalendarEntry],
    commission: &CommissionPlan,
) -> KrediResult<(Vec<InstallmentRow>, Money)> {
    let n = dates.len();
    let rate = request.periodic_rate();
    let level = level_installment(request)?;
    let factors = annuity_factors(tax_inclusive_rate(rate, request.bsmv_rate), n as u32);
    let exact_balance = |periods_left: usize| request.principal * (factors[periods_left] / factors[n]);

    let mut rows = Vec::with_capacity(n);
    let mut balance = request.principal;

    for (k, entry) in dates.iter().enumerate() {
        let periods_left = n - k - 1;
        let interest = round_money(exact_balance(periods_left + 1) * rate);
        let interest_bsmv = round_money(interest * request.bsmv_rate);

        let remaining = if periods_left == 0 {
            Decimal::ZERO
        } else {
            round_money(exact_balance(periods_left))
        };
        let principal_payment = balance - remaining;
        balance = remaining;

        let (commission_payment, commission_bsmv) = commission.portion(entry.installment_number);

        rows.push(InstallmentRow::assemble(
            entry,
            entry.fixed_accrual_days,
            principal_payment,
            interest,
            interest_bsmv + commission_bsmv,
            commission_payment,
            balance,
        ));
    }

    Ok((rows, level))
}
