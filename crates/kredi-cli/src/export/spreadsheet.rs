use std::fs::File;
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, Workbook, Worksheet, XlsxError};

use kredi_core::amortization::Schedule;
use kredi_core::calendar::CalendarEntry;
use kredi_core::report::{self, NumberStyle, ReportTable, CALENDAR_HEADERS, SCHEDULE_HEADERS};

/// Lets spreadsheet software detect UTF-8 for the Turkish headers.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Semicolon-delimited so comma decimals survive a Turkish-locale import.
const DELIMITER: u8 = b';';

const MONEY_FORMAT: &str = "#,##0.00";
const DATE_FORMAT: &str = "dd.mm.yyyy";
const TOTALS_LABEL: &str = "Toplam:";

/// Payment plan followed by the summary block. `.csv` paths get a
/// delimited text file, anything else an xlsx workbook.
pub fn write_schedule(path: &str, schedule: &Schedule) -> Result<(), Box<dyn std::error::Error>> {
    if is_csv(path) {
        let report = report::schedule_report(schedule, NumberStyle::Spreadsheet);
        return write_tables(path, &[&report.schedule, &report.summary]);
    }
    schedule_workbook(schedule)?.save(path)?;
    Ok(())
}

pub fn write_calendar(path: &str, entries: &[CalendarEntry]) -> Result<(), Box<dyn std::error::Error>> {
    if is_csv(path) {
        let table = report::calendar_table(entries);
        return write_tables(path, &[&table]);
    }
    calendar_workbook(entries)?.save(path)?;
    Ok(())
}

fn is_csv(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Cell formats shared by every sheet.
struct Formats {
    header: Format,
    money: Format,
    date: Format,
    total: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold().set_align(FormatAlign::Center),
            money: Format::new().set_num_format(MONEY_FORMAT),
            date: Format::new().set_num_format(DATE_FORMAT),
            total: Format::new().set_bold().set_num_format(MONEY_FORMAT),
        }
    }
}

fn schedule_workbook(schedule: &Schedule) -> Result<Workbook, XlsxError> {
    let formats = Formats::new();
    let mut plan = Worksheet::new();
    plan.set_name("Ödeme Planı")?;
    write_headers(&mut plan, &SCHEDULE_HEADERS, &formats)?;

    let mut row: u32 = 1;
    if let Some(upfront) = &schedule.upfront_charge {
        plan.write_number(row, 0, 0.0)?;
        write_date(&mut plan, row, 1, upfront.payment_date, &formats)?;
        let amounts = [
            schedule.principal,
            upfront.total,
            Decimal::ZERO,
            Decimal::ZERO,
            upfront.bsmv,
            upfront.commission,
        ];
        write_amounts(&mut plan, row, 2, &amounts, &formats.money)?;
        row += 1;
    }

    for installment in &schedule.installments {
        plan.write_number(row, 0, f64::from(installment.installment_number))?;
        write_date(&mut plan, row, 1, installment.payment_date, &formats)?;
        let amounts = [
            installment.remaining_principal,
            installment.installment_amount,
            installment.principal_payment,
            installment.interest_payment,
            installment.bsmv,
            installment.commission_payment,
        ];
        write_amounts(&mut plan, row, 2, &amounts, &formats.money)?;
        row += 1;
    }

    let t = &schedule.totals;
    plan.write_string_with_format(row, 2, TOTALS_LABEL, &formats.header)?;
    let totals = [
        t.total_loan_cost,
        t.total_principal,
        t.total_interest,
        t.total_bsmv,
        t.total_commission,
    ];
    write_amounts(&mut plan, row, 3, &totals, &formats.total)?;
    for col in 0..SCHEDULE_HEADERS.len() as u16 {
        plan.set_column_width(col, 18)?;
    }

    let summary = report::summary_table(schedule, NumberStyle::Spreadsheet);
    let mut summary_sheet = Worksheet::new();
    summary_sheet.set_name(summary.title.as_str())?;
    write_text_table(&mut summary_sheet, &summary, &formats)?;
    summary_sheet.set_column_width(0, 30)?;
    summary_sheet.set_column_width(1, 20)?;

    let mut workbook = Workbook::new();
    workbook.push_worksheet(plan);
    workbook.push_worksheet(summary_sheet);
    Ok(workbook)
}

fn calendar_workbook(entries: &[CalendarEntry]) -> Result<Workbook, XlsxError> {
    let formats = Formats::new();
    let mut sheet = Worksheet::new();
    sheet.set_name("Ödeme Günleri")?;
    write_headers(&mut sheet, &CALENDAR_HEADERS, &formats)?;

    for (i, e) in entries.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, f64::from(e.installment_number))?;
        write_date(&mut sheet, row, 1, e.scheduled_date, &formats)?;
        write_date(&mut sheet, row, 2, e.payment_date, &formats)?;
        sheet.write_number(row, 3, f64::from(e.fixed_accrual_days))?;
        sheet.write_number(row, 4, f64::from(e.actual_accrual_days))?;
        write_date(&mut sheet, row, 5, e.accrual_start, &formats)?;
        write_date(&mut sheet, row, 6, e.accrual_end, &formats)?;
    }
    for col in 0..CALENDAR_HEADERS.len() as u16 {
        sheet.set_column_width(col, 22)?;
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(sheet);
    Ok(workbook)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], formats: &Formats) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }
    Ok(())
}

fn write_text_table(sheet: &mut Worksheet, table: &ReportTable, formats: &Formats) -> Result<(), XlsxError> {
    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header.as_str(), &formats.header)?;
    }
    for (i, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            sheet.write_string(i as u32 + 1, col as u16, cell.as_str())?;
        }
    }
    Ok(())
}

fn write_amounts(
    sheet: &mut Worksheet,
    row: u32,
    first_col: u16,
    amounts: &[Decimal],
    format: &Format,
) -> Result<(), XlsxError> {
    for (offset, amount) in amounts.iter().enumerate() {
        let value = amount.to_f64().unwrap_or_default();
        sheet.write_number_with_format(row, first_col + offset as u16, value, format)?;
    }
    Ok(())
}

fn write_date(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    date: NaiveDate,
    formats: &Formats,
) -> Result<(), XlsxError> {
    let cell = ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
    sheet.write_datetime_with_format(row, col, &cell, &formats.date)?;
    Ok(())
}

fn write_tables(path: &str, tables: &[&ReportTable]) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(file);

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            wtr.write_record([table.title.as_str()])?;
        }
        wtr.write_record(&table.headers)?;
        for row in &table.rows {
            wtr.write_record(row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
