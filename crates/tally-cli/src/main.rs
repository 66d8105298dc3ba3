//! Tally CLI - Personal finance transaction analyzer
//!
//! Usage:
//!   tally --data ops.csv home                  Greeting, cards, top transactions
//!   tally --data ops.csv events --range Y      Expenses and income for a period
//!   tally --data ops.csv report weekdays       Spending reports
//!   tally --data ops.csv serve --port 3000     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = commands::load_settings(cli.config.as_deref())?;
    let data_path = cli.data.clone().or_else(|| settings.data_path.clone());

    match cli.command {
        Commands::Home { datetime, json } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            let reference = commands::parse_datetime_arg(datetime.as_deref())?;
            let market = commands::market_for(&settings, cli.offline)?;
            commands::cmd_home(&transactions, reference, &settings, market.as_ref(), json).await
        }
        Commands::Events {
            datetime,
            range,
            json,
        } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            let reference = commands::parse_datetime_arg(datetime.as_deref())?;
            let period = commands::parse_period_arg(&range)?;
            let market = commands::market_for(&settings, cli.offline)?;
            commands::cmd_events(
                &transactions,
                reference,
                period,
                &settings,
                market.as_ref(),
                json,
            )
            .await
        }
        Commands::Cashback { year, month, json } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            commands::cmd_cashback(&transactions, &settings.cashback, year, month, json)
        }
        Commands::Invest { month, limit } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            commands::cmd_invest(&transactions, &month, limit)
        }
        Commands::Search { query, output } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            commands::cmd_search(&transactions, &query, &output)
        }
        Commands::Phones { output } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            commands::cmd_phones(&transactions, &output)
        }
        Commands::Transfers { output } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            commands::cmd_transfers(&transactions, &settings.transfer_category, &output)
        }
        Commands::Report { report_type } => {
            let transactions = commands::load_transactions(data_path.as_deref())?;
            match report_type {
                ReportType::Category {
                    category,
                    date,
                    output,
                } => {
                    let reference = commands::parse_date_arg(date.as_deref())?;
                    commands::cmd_report_category(&transactions, &category, reference, &output)
                }
                ReportType::Weekdays { date, output } => {
                    let reference = commands::parse_date_arg(date.as_deref())?;
                    commands::cmd_report_weekdays(&transactions, reference, &output)
                }
                ReportType::WorkWeekend { date, output } => {
                    let reference = commands::parse_date_arg(date.as_deref())?;
                    commands::cmd_report_work_weekend(&transactions, reference, &output)
                }
                ReportType::Summary {
                    date,
                    range,
                    output,
                } => {
                    let reference = commands::parse_date_arg(date.as_deref())?;
                    let period = commands::parse_period_arg(&range)?;
                    commands::cmd_report_summary(&transactions, reference, period, &output)
                }
            }
        }
        Commands::Serve { port, host } => {
            commands::cmd_serve(data_path.as_deref(), settings, &host, port, cli.offline).await
        }
    }
}
