//! File sinks for payment plans. A failed export never fails the command.

pub mod document;
pub mod spreadsheet;

use colored::Colorize;

/// Print a warning for a failed export and carry on.
pub fn report_failure(kind: &str, path: &str, result: Result<(), Box<dyn std::error::Error>>) {
    match result {
        Ok(()) => log::info!("{kind} export written to {path}"),
        Err(e) => eprintln!(
            "{}: {} export to '{}' failed: {}",
            "warning".yellow().bold(),
            kind,
            path,
            e
        ),
    }
}
