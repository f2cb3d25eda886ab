//! Turkish number and date formatting.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

pub const CURRENCY_SUFFIX: &str = "TL";

/// How numbers are written into a report cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// `1.234.567,89 TL`: for printed documents and on-screen tables.
    #[default]
    Document,
    /// `1234567,89`: for spreadsheets in a Turkish locale.
    Spreadsheet,
}

/// Format `value` with `dp` decimals, comma as decimal separator and
/// (for documents) dots between thousands.
pub fn format_number(value: Decimal, dp: u32, style: NumberStyle) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", dp as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (plain, None),
    };

    let int_part = match style {
        NumberStyle::Document => group_thousands(&int_part),
        NumberStyle::Spreadsheet => int_part,
    };

    let mut out = String::with_capacity(int_part.len() + dp as usize + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&int_part);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Monetary amount to kuruş, with the currency suffix in document style.
pub fn format_money(amount: Money, style: NumberStyle) -> String {
    let number = format_number(amount, 2, style);
    match style {
        NumberStyle::Document => format!("{number} {CURRENCY_SUFFIX}"),
        NumberStyle::Spreadsheet => number,
    }
}

/// Decimal rate shown as a percentage with two decimals (0.3752 -> `37,52`).
pub fn format_percent(rate: Rate, style: NumberStyle) -> String {
    format_number(rate * dec!(100), 2, style)
}

/// `dd-mm-YYYY`, as used on Turkish payment plans.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
