use clap::Args;
use serde_json::Value;

use kredi_core::calendar::{self, CalendarRequest};

use super::args::DateArgs;
use crate::{export, input};

/// Arguments for payment-day generation
#[derive(Args)]
pub struct CalendarArgs {
    /// Path to a JSON or YAML calendar request
    #[arg(long)]
    pub input: Option<String>,

    /// Number of installments
    #[arg(long)]
    pub term: Option<u32>,

    #[command(flatten)]
    pub dates: DateArgs,

    /// Write the payment days as an xlsx workbook (semicolon CSV when the path ends in .csv)
    #[arg(long)]
    pub spreadsheet: Option<String>,
}

pub fn run_calendar(args: CalendarArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args)?;
    let output = calendar::generate_payment_calendar(&request)?;

    if let Some(ref path) = args.spreadsheet {
        export::report_failure(
            "spreadsheet",
            path,
            export::spreadsheet::write_calendar(path, &output.result),
        );
    }

    Ok(serde_json::to_value(output)?)
}

fn resolve_request(args: &CalendarArgs) -> Result<CalendarRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if args.term.is_none() {
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
    }
    request_from_flags(args)
}

fn request_from_flags(args: &CalendarArgs) -> Result<CalendarRequest, Box<dyn std::error::Error>> {
    let installments = args
        .term
        .ok_or("--term, --input <file> or stdin required for a payment calendar")?;
    Ok(CalendarRequest {
        start_date: args.dates.start_date_or_today(),
        installments,
        frequency: args.dates.frequency.into(),
        holidays: args.dates.holidays.into(),
        extra_holidays: args.dates.extra_holidays.clone(),
    })
}
