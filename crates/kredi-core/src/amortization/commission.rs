use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::loan::{LoanRequest, UpfrontCharge};
use crate::types::{round_money, Money};

/// When the one-time commission is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionMode {
    /// Paid in full on the start date.
    #[default]
    Upfront,
    /// Spread evenly across the installments.
    Amortized,
}

/// Commission amount and its tax, resolved once per request.
#[derive(Debug, Clone)]
pub(crate) struct CommissionPlan {
    mode: CommissionMode,
    amount: Money,
    bsmv_rate: Decimal,
    taxed: bool,
    term: u32,
}

impl CommissionPlan {
    pub(crate) fn new(request: &LoanRequest) -> Self {
        Self {
            mode: request.commission_mode,
            amount: round_money(request.principal * request.commission_rate),
            bsmv_rate: request.bsmv_rate,
            taxed: request.bsmv_on_commission,
            term: request.term,
        }
    }

    fn tax(&self, commission: Money) -> Money {
        if self.taxed {
            round_money(commission * self.bsmv_rate)
        } else {
            Decimal::ZERO
        }
    }

    /// Upfront charge, if any commission is payable on the start date.
    pub(crate) fn upfront_charge(&self, start_date: NaiveDate) -> Option<UpfrontCharge> {
        if self.mode != CommissionMode::Upfront || self.amount.is_zero() {
            return None;
        }
        let bsmv = self.tax(self.amount);
        Some(UpfrontCharge {
            payment_date: start_date,
            commission: self.amount,
            bsmv,
            total: self.amount + bsmv,
        })
    }

    /// Commission and its tax carried by installment `k` (1-based).
    ///
    /// The last installment takes whatever rounding left over, so the
    /// portions always add up to the full commission.
    pub(crate) fn portion(&self, k: u32) -> (Money, Money) {
        if self.mode != CommissionMode::Amortized || self.amount.is_zero() || self.term == 0 {
            return (Decimal::ZERO, Decimal::ZERO);
        }
        let regular = round_money(self.amount / Decimal::from(self.term));
        let commission = if k == self.term {
            self.amount - regular * Decimal::from(self.term - 1)
        } else {
            regular
        };
        (commission, self.tax(commission))
    }
}
