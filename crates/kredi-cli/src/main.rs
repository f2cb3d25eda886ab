mod commands;
mod export;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calendar::CalendarArgs;
use commands::plan::PlanArgs;

/// Turkish commercial loan payment plans
#[derive(Parser)]
#[command(
    name = "kredi",
    version,
    about = "Turkish commercial loan payment plans",
    long_about = "Computes payment plans for Turkish commercial loans with decimal precision. \
                  Supports equal principal (Eşit Ana Paralı) and equal installment \
                  (Eşit Taksitli) schemes with BSMV, commission and business-day \
                  adjusted payment dates, and exports plans for spreadsheets and documents."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a loan payment plan (Ödeme Planı)
    Plan(PlanArgs),
    /// List payment dates and accrual days (Ödeme Günleri)
    Calendar(CalendarArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::plan::run_plan(args),
        Commands::Calendar(args) => commands::calendar::run_calendar(args),
        Commands::Version => {
            println!("kredi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
