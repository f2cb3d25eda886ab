use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use kredi_core::amortization::{self, LoanRequest};
use kredi_core::calendar::{self, CalendarRequest};
use kredi_core::report::{self, NumberStyle};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_payment_calendar(input_json: String) -> NapiResult<String> {
    let input: CalendarRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calendar::generate_payment_calendar(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReportInput {
    request: LoanRequest,
    #[serde(default)]
    style: NumberStyle,
}

/// Turkish-labelled plan and summary tables, formatted for display.
#[napi]
pub fn schedule_report(input_json: String) -> NapiResult<String> {
    let input: ReportInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_schedule(&input.request).map_err(to_napi_error)?;
    let report = report::schedule_report(&output.result, input.style);
    serde_json::to_string(&report).map_err(to_napi_error)
}
