use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use kredi_core::amortization::{self, LoanRequest};

use super::args::{AccrualArg, CommissionModeArg, DateArgs, SchemeArg};
use crate::{export, input};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Arguments for a payment plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to a JSON or YAML request file
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount (TL)
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate as a decimal (0.30 = 30%)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "monthly_rate")]
    pub annual_rate: Option<Decimal>,

    /// Monthly interest rate as a decimal; converted to annual x 12
    #[arg(long, allow_hyphen_values = true)]
    pub monthly_rate: Option<Decimal>,

    /// Number of installments
    #[arg(long)]
    pub term: Option<u32>,

    /// Repayment scheme
    #[arg(long, value_enum, default_value = "equal-principal")]
    pub scheme: SchemeArg,

    #[command(flatten)]
    pub dates: DateArgs,

    /// BSMV rate as a decimal
    #[arg(long, allow_hyphen_values = true, default_value = "0.05")]
    pub bsmv_rate: Decimal,

    /// One-time commission as a fraction of principal
    #[arg(long, allow_hyphen_values = true, default_value = "0")]
    pub commission_rate: Decimal,

    /// How the commission is collected
    #[arg(long, value_enum, default_value = "upfront")]
    pub commission_mode: CommissionModeArg,

    /// Do not charge BSMV on the commission
    #[arg(long)]
    pub no_bsmv_on_commission: bool,

    /// Accrual day count used for interest
    #[arg(long, value_enum, default_value = "fixed")]
    pub accrual: AccrualArg,

    /// Write the plan as an xlsx workbook (semicolon CSV when the path ends in .csv)
    #[arg(long)]
    pub spreadsheet: Option<String>,

    /// Write the plan and summary as a PDF (boxed text when the path ends in .txt)
    #[arg(long)]
    pub document: Option<String>,

    /// Directory holding the TrueType font used for PDF documents
    #[arg(long, default_value = export::document::DEFAULT_FONT_DIR)]
    pub font_dir: String,

    /// Font family name; files are <family>-Regular.ttf, -Bold, -Italic, -BoldItalic
    #[arg(long, default_value = export::document::DEFAULT_FONT_FAMILY)]
    pub font_family: String,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args)?;
    let output = amortization::calculate_schedule(&request)?;

    if let Some(ref path) = args.spreadsheet {
        export::report_failure(
            "spreadsheet",
            path,
            export::spreadsheet::write_schedule(path, &output.result),
        );
    }
    if let Some(ref path) = args.document {
        let fonts = export::document::FontSource {
            dir: args.font_dir.clone(),
            family: args.font_family.clone(),
        };
        export::report_failure(
            "document",
            path,
            export::document::write_schedule(path, &output.result, &fonts),
        );
    }

    Ok(serde_json::to_value(output)?)
}

fn resolve_request(args: &PlanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if args.principal.is_none() {
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
    }
    request_from_flags(args)
}

fn request_from_flags(args: &PlanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    let principal = args
        .principal
        .ok_or("--principal, --input <file> or stdin required for a payment plan")?;
    let annual_rate = match (args.annual_rate, args.monthly_rate) {
        (Some(annual), _) => annual,
        (None, Some(monthly)) => monthly * MONTHS_PER_YEAR,
        (None, None) => return Err("--annual-rate or --monthly-rate required".into()),
    };
    let term = args.term.ok_or("--term required")?;

    let mut request = LoanRequest::new(
        principal,
        annual_rate,
        term,
        args.scheme.into(),
        args.dates.start_date_or_today(),
    );
    request.frequency = args.dates.frequency.into();
    request.holidays = args.dates.holidays.into();
    request.extra_holidays = args.dates.extra_holidays.clone();
    request.bsmv_rate = args.bsmv_rate;
    request.commission_rate = args.commission_rate;
    request.commission_mode = args.commission_mode.into();
    request.bsmv_on_commission = !args.no_bsmv_on_commission;
    request.accrual_basis = args.accrual.into();
    Ok(request)
}
