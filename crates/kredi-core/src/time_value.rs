use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::KrediError;
use crate::types::{Money, Rate};
use crate::KrediResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// Periodic Internal Rate of Return using Newton-Raphson.
///
/// Discount factors are accumulated period by period so long schedules
/// never raise `1 + r` to a large power in one step.
pub fn irr(cash_flows: &[Money], guess: Rate) -> KrediResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(KrediError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = guess;
    let mut npv_val = Decimal::ZERO;

    for i in 0..MAX_IRR_ITERATIONS {
        let (value, slope) = npv_and_slope(cash_flows, rate).ok_or_else(|| {
            KrediError::FinancialImpossibility(format!(
                "IRR discounting left the representable range at rate {rate}"
            ))
        })?;
        npv_val = value;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if slope.is_zero() {
            return Err(KrediError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        rate = npv_val
            .checked_div(slope)
            .and_then(|step| rate.checked_sub(step))
            .ok_or_else(|| {
                KrediError::FinancialImpossibility(format!("IRR step overflowed at iteration {i}"))
            })?;

        // Guard against divergence
        if rate < dec!(-0.99) {
            rate = dec!(-0.99);
        } else if rate > dec!(10.0) {
            rate = dec!(10.0);
        }
    }

    Err(KrediError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv_val,
    })
}

/// NPV of equally spaced flows and its derivative with respect to the rate.
///
/// Flows past the point where `(1 + r)^t` leaves `Decimal` range are
/// negligible and skipped; `None` means the sum itself overflowed.
fn npv_and_slope(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut value = Decimal::ZERO;
    let mut slope = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        if discount.is_zero() {
            return None;
        }
        value = value.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            if let Some(denominator) = discount.checked_mul(one_plus_r) {
                let t_dec = Decimal::from(t as i64);
                slope = slope.checked_sub(t_dec.checked_mul(*cf)?.checked_div(denominator)?)?;
            }
        }
    }

    Some((value, slope))
}

/// Level payment that amortises `principal` over `nper` periods at `rate`.
///
/// `payment = principal × r / (1 − (1 + r)^−n)`; with a zero rate the
/// payment is simply `principal / n`.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> KrediResult<Money> {
    if nper == 0 {
        return Err(KrediError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(KrediError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let discount = Decimal::ONE / (Decimal::ONE + rate);
    let discount_n = discount.checked_powi(nper as i64).ok_or_else(|| {
        KrediError::FinancialImpossibility(format!(
            "annuity factor overflowed for rate {rate} over {nper} periods"
        ))
    })?;
    let denominator = Decimal::ONE - discount_n;

    if denominator.is_zero() {
        return Err(KrediError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    Ok(principal * rate / denominator)
}

/// Compound a periodic rate up to an annual effective rate.
pub fn annualise(periodic_rate: Rate, periods_per_year: u32) -> KrediResult<Rate> {
    let growth = (Decimal::ONE + periodic_rate)
        .checked_powi(periods_per_year as i64)
        .ok_or_else(|| {
            KrediError::FinancialImpossibility(format!(
                "annualising periodic rate {periodic_rate} overflowed"
            ))
        })?;
    Ok(growth - Decimal::ONE)
}
