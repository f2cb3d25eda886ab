use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format::{format_date, format_money, format_number, format_percent, NumberStyle};
use crate::amortization::{LoanScheme, Schedule};
use crate::calendar::CalendarEntry;

/// Column headers of the payment plan, in display order.
pub const SCHEDULE_HEADERS: [&str; 8] = [
    "Taksit No",
    "Ödeme Tarihi",
    "Kalan Anapara",
    "Taksit Tutarı",
    "Anapara Ödemesi",
    "Faiz Ödemesi",
    "BSMV Ödemesi",
    "Komisyon Ödemesi",
];

/// Column headers of the payment-day listing.
pub const CALENDAR_HEADERS: [&str; 7] = [
    "Taksit No",
    "Planlanan Tarih",
    "Ödeme Tarihi",
    "Sabit Faiz Gün Sayısı",
    "Gerçek Faiz Gün Sayısı",
    "Tahakkuk Başlangıç",
    "Tahakkuk Bitiş",
];

pub const SUMMARY_HEADERS: [&str; 2] = ["Gösterge", "Değer"];

const TOTALS_LABEL: &str = "Toplam:";

/// A titled grid of already-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Everything an export sink needs to render a payment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub schedule: ReportTable,
    pub summary: ReportTable,
}

/// Payment plan with an opening commission row and a closing totals row.
pub fn schedule_table(schedule: &Schedule, style: NumberStyle) -> ReportTable {
    let money = |v: Decimal| format_money(v, style);
    let mut table = ReportTable::new("Ödeme Planı", &SCHEDULE_HEADERS);

    if let Some(upfront) = &schedule.upfront_charge {
        table.rows.push(vec![
            "0".to_string(),
            format_date(upfront.payment_date),
            money(schedule.principal),
            money(upfront.total),
            money(Decimal::ZERO),
            money(Decimal::ZERO),
            money(upfront.bsmv),
            money(upfront.commission),
        ]);
    }

    for row in &schedule.installments {
        table.rows.push(vec![
            row.installment_number.to_string(),
            format_date(row.payment_date),
            money(row.remaining_principal),
            money(row.installment_amount),
            money(row.principal_payment),
            money(row.interest_payment),
            money(row.bsmv),
            money(row.commission_payment),
        ]);
    }

    let t = &schedule.totals;
    table.rows.push(vec![
        String::new(),
        String::new(),
        TOTALS_LABEL.to_string(),
        money(t.total_loan_cost),
        money(t.total_principal),
        money(t.total_interest),
        money(t.total_bsmv),
        money(t.total_commission),
    ]);

    table
}

/// Headline figures shown above the plan.
pub fn summary_table(schedule: &Schedule, style: NumberStyle) -> ReportTable {
    let money = |v: Decimal| format_money(v, style);
    let t = &schedule.totals;
    let mut table = ReportTable::new("Kredi Özeti", &SUMMARY_HEADERS);

    let mut push = |label: &str, value: String| table.rows.push(vec![label.to_string(), value]);

    push("Kredi Türü", schedule.scheme.label().to_string());
    push("Toplam Kredi Maliyeti", money(t.total_loan_cost));
    // First row carries any amortized commission and its BSMV.
    if schedule.scheme == LoanScheme::EqualInstallment {
        if let Some(first) = schedule.installments.first() {
            push("Taksit Tutarı", money(first.installment_amount));
        }
    }
    push("Toplam Ana Para", money(schedule.principal));
    push("Toplam Faiz", money(t.total_interest));
    push("Toplam BSMV", money(t.total_bsmv));
    push("Toplam Komisyon", money(t.total_commission));
    push(
        "Ortalama Vade (Yıl)",
        format_number(schedule.cost.average_maturity_years, 2, style),
    );
    push(
        "All-In Faiz Oranı (Yıllık %)",
        format_percent(schedule.cost.all_in_rate, style),
    );
    if let Some(effective) = schedule.cost.effective_annual_rate {
        push("Yıllık Efektif Maliyet (%)", format_percent(effective, style));
    }

    table
}

/// Plan plus summary, ready for a document or spreadsheet sink.
pub fn schedule_report(schedule: &Schedule, style: NumberStyle) -> ScheduleReport {
    ScheduleReport {
        schedule: schedule_table(schedule, style),
        summary: summary_table(schedule, style),
    }
}

/// Payment days with both fixed and actual accrual counts.
pub fn calendar_table(entries: &[CalendarEntry]) -> ReportTable {
    let mut table = ReportTable::new("Ödeme Günleri", &CALENDAR_HEADERS);
    for e in entries {
        table.rows.push(vec![
            e.installment_number.to_string(),
            format_date(e.scheduled_date),
            format_date(e.payment_date),
            e.fixed_accrual_days.to_string(),
            e.actual_accrual_days.to_string(),
            format_date(e.accrual_start),
            format_date(e.accrual_end),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{calculate_schedule, CommissionMode, LoanRequest};
    use crate::calendar::{generate_payment_calendar, CalendarRequest, HolidayCalendarKind};
    use crate::types::PaymentFrequency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn schedule(scheme: LoanScheme, commission: Decimal) -> Schedule {
        let req = LoanRequest {
            commission_rate: commission,
            ..LoanRequest::new(dec!(100000), dec!(0.30), 12, scheme, start())
        };
        calculate_schedule(&req).unwrap().result
    }

    #[test]
    fn test_schedule_table_shape_with_commission() {
        let table = schedule_table(&schedule(LoanScheme::EqualPrincipal, dec!(0.01)), NumberStyle::Document);
        // opening commission row + 12 installments + totals
        assert_eq!(table.rows.len(), 14);
        assert_eq!(table.headers[0], "Taksit No");
        assert_eq!(table.rows[0][0], "0");
        assert_eq!(table.rows[0][1], "15-01-2025");
        assert_eq!(table.rows[0][3], "1.050,00 TL");
        assert_eq!(table.rows[0][7], "1.000,00 TL");
        assert_eq!(table.rows[13][2], "Toplam:");
        assert_eq!(table.rows[13][4], "100.000,00 TL");
    }

    #[test]
    fn test_schedule_table_without_commission() {
        let table = schedule_table(&schedule(LoanScheme::EqualPrincipal, dec!(0)), NumberStyle::Spreadsheet);
        assert_eq!(table.rows.len(), 13);
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[0][5], "2500,00");
        assert_eq!(table.rows[11][2], "0,00");
    }

    #[test]
    fn test_summary_shows_level_installment_only_for_annuity() {
        let annuity = summary_table(&schedule(LoanScheme::EqualInstallment, dec!(0.01)), NumberStyle::Document);
        assert!(annuity.rows.iter().any(|r| r[0] == "Taksit Tutarı"));
        assert!(annuity.rows.iter().any(|r| r[1] == "Eşit Taksitli Kredi"));

        let straight = summary_table(&schedule(LoanScheme::EqualPrincipal, dec!(0.01)), NumberStyle::Document);
        assert!(!straight.rows.iter().any(|r| r[0] == "Taksit Tutarı"));
        let commission = straight.rows.iter().find(|r| r[0] == "Toplam Komisyon").unwrap();
        assert_eq!(commission[1], "1.000,00 TL");
    }

    #[test]
    fn test_installment_headline_includes_amortized_commission() {
        let req = LoanRequest {
            commission_rate: dec!(0.012),
            commission_mode: CommissionMode::Amortized,
            ..LoanRequest::new(dec!(100000), dec!(0.30), 12, LoanScheme::EqualInstallment, start())
        };
        let schedule = calculate_schedule(&req).unwrap().result;
        let table = summary_table(&schedule, NumberStyle::Spreadsheet);
        let headline = table.rows.iter().find(|r| r[0] == "Taksit Tutarı").unwrap();

        let first = &schedule.installments[0];
        assert_eq!(first.commission_payment, dec!(100));
        assert_eq!(headline[1], format_money(first.installment_amount, NumberStyle::Spreadsheet));
        assert_eq!(headline[1], "9927,64");
    }

    #[test]
    fn test_calendar_table() {
        let out = generate_payment_calendar(&CalendarRequest {
            start_date: start(),
            installments: 3,
            frequency: PaymentFrequency::Monthly,
            holidays: HolidayCalendarKind::Turkey,
            extra_holidays: vec![],
        })
        .unwrap();
        let table = calendar_table(&out.result);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][1], "15-02-2025");
        assert_eq!(table.rows[0][2], "17-02-2025");
        assert_eq!(table.rows[0][3], "30");
        assert_eq!(table.rows[0][4], "33");
    }
}
