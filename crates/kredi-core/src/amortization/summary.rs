use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::equal_installment::tax_inclusive_rate;
use super::loan::{CostMetrics, InstallmentRow, LoanRequest, ScheduleTotals, UpfrontCharge};
use crate::time_value::{annualise, irr};
use crate::types::{Money, Rate};

const DAYS_PER_YEAR: Decimal = dec!(365);
const RATE_DP: u32 = 6;
const YEARS_DP: u32 = 4;

/// Sum the plan's components.
pub fn totals(rows: &[InstallmentRow], upfront: Option<&UpfrontCharge>) -> ScheduleTotals {
    let total_principal: Money = rows.iter().map(|r| r.principal_payment).sum();
    let total_interest: Money = rows.iter().map(|r| r.interest_payment).sum();
    let total_installments: Money = rows.iter().map(|r| r.installment_amount).sum();

    let upfront_bsmv = upfront.map(|u| u.bsmv).unwrap_or(Decimal::ZERO);
    let upfront_commission = upfront.map(|u| u.commission).unwrap_or(Decimal::ZERO);
    let total_upfront = upfront.map(|u| u.total).unwrap_or(Decimal::ZERO);

    let total_bsmv: Money = rows.iter().map(|r| r.bsmv).sum::<Money>() + upfront_bsmv;
    let total_commission: Money =
        rows.iter().map(|r| r.commission_payment).sum::<Money>() + upfront_commission;

    ScheduleTotals {
        total_principal,
        total_interest,
        total_bsmv,
        total_commission,
        total_installments,
        total_upfront,
        total_loan_cost: total_installments + total_upfront,
    }
}

/// Average maturity, all-in rate and effective annual cost.
pub fn cost_metrics(
    request: &LoanRequest,
    rows: &[InstallmentRow],
    totals: &ScheduleTotals,
    warnings: &mut Vec<String>,
) -> CostMetrics {
    let average_maturity_years = average_maturity_years(request, rows);

    // Interest + every BSMV + commission, per year of average exposure
    let financing_cost = totals.total_interest + totals.total_bsmv + totals.total_commission;
    let exposure = average_maturity_years * request.principal;
    let all_in_rate = if exposure.is_zero() {
        warnings.push("Average maturity is zero; all-in rate not meaningful".into());
        Decimal::ZERO
    } else {
        (financing_cost / exposure).round_dp(RATE_DP)
    };

    let effective_annual_rate = effective_annual_rate(request, rows, totals, warnings);

    CostMetrics {
        average_maturity_years: average_maturity_years.round_dp(YEARS_DP),
        all_in_rate,
        effective_annual_rate,
    }
}

/// Principal-weighted days from disbursement to each payment, in years.
fn average_maturity_years(request: &LoanRequest, rows: &[InstallmentRow]) -> Decimal {
    let mut weighted_days = Decimal::ZERO;
    let mut principal_paid = Decimal::ZERO;

    for row in rows {
        let days = (row.payment_date - request.start_date).num_days();
        weighted_days += row.principal_payment * Decimal::from(days);
        principal_paid += row.principal_payment;
    }

    if principal_paid.is_zero() {
        return Decimal::ZERO;
    }
    weighted_days / principal_paid / DAYS_PER_YEAR
}

/// Annualised IRR of the borrower's flows: net proceeds at t0, installments after.
fn effective_annual_rate(
    request: &LoanRequest,
    rows: &[InstallmentRow],
    totals: &ScheduleTotals,
    warnings: &mut Vec<String>,
) -> Option<Rate> {
    let mut flows: Vec<Money> = Vec::with_capacity(rows.len() + 1);
    flows.push(request.principal - totals.total_upfront);
    flows.extend(rows.iter().map(|r| -r.installment_amount));

    let guess = tax_inclusive_rate(request.periodic_rate(), request.bsmv_rate);
    let periodic = match irr(&flows, guess) {
        Ok(rate) => rate,
        Err(e) => {
            warnings.push(format!("Effective cost calculation warning: {e}"));
            return None;
        }
    };

    match annualise(periodic, request.frequency.periods_per_year()) {
        Ok(rate) => Some(rate.round_dp(RATE_DP)),
        Err(e) => {
            warnings.push(format!("Effective cost calculation warning: {e}"));
            None
        }
    }
}
