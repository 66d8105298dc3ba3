//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use chrono::{NaiveDate, Timelike};
use clap::Parser;
use tally_core::test_utils::{sample_transactions, SAMPLE_CSV};
use tally_core::{CashbackPolicy, Period, Settings, StaticMarketData};

use crate::cli::{Cli, Commands, OutputArgs, ReportType};
use crate::commands::{self, truncate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn save_to(path: PathBuf) -> OutputArgs {
    OutputArgs {
        json: false,
        output: Some(path),
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_report_summary_args() {
    let cli = Cli::try_parse_from([
        "tally", "--data", "ops.csv", "report", "summary", "--range", "Y", "--json",
    ])
    .unwrap();

    assert_eq!(cli.data, Some(PathBuf::from("ops.csv")));
    match cli.command {
        Commands::Report {
            report_type: ReportType::Summary { range, output, .. },
        } => {
            assert_eq!(range, "Y");
            assert!(output.json);
            assert!(output.output.is_none());
        }
        _ => panic!("expected report summary"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["tally", "phones", "--offline", "-v", "--data", "x.json"]).unwrap();
    assert!(cli.offline);
    assert!(cli.verbose);
    assert_eq!(cli.data, Some(PathBuf::from("x.json")));
}

#[test]
fn test_parse_invest_default_limit() {
    let cli = Cli::try_parse_from(["tally", "invest", "--month", "2023-06"]).unwrap();
    match cli.command {
        Commands::Invest { month, limit } => {
            assert_eq!(month, "2023-06");
            assert_eq!(limit, 50.0);
        }
        _ => panic!("expected invest"),
    }
}

#[test]
fn test_parse_cashback_requires_month() {
    assert!(Cli::try_parse_from(["tally", "cashback", "--year", "2023"]).is_err());
}

#[test]
fn test_parse_date_args() {
    let dt = commands::parse_datetime_arg(Some("2023-06-20 18:30:00")).unwrap();
    assert_eq!(dt.hour(), 18);
    assert!(commands::parse_datetime_arg(Some("yesterday")).is_err());

    assert_eq!(
        commands::parse_date_arg(Some("2023-06-20")).unwrap(),
        date(2023, 6, 20)
    );
    let err = commands::parse_date_arg(Some("20.06.2023")).unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));

    assert_eq!(commands::parse_period_arg("all").unwrap(), Period::All);
    assert!(commands::parse_period_arg("Q").is_err());
}

// ========== Loading Tests ==========

#[test]
fn test_load_transactions_requires_path() {
    let err = commands::load_transactions(None).unwrap_err();
    assert!(err.to_string().contains("No transaction file"));
}

#[test]
fn test_load_transactions_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("operations.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let transactions = commands::load_transactions(Some(&path)).unwrap();
    assert_eq!(transactions.len(), 5);
    assert_eq!(transactions[0].amount, 1262.0);
}

#[test]
fn test_load_transactions_bad_date_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("operations.csv");
    std::fs::write(&path, "Date,Amount,Category\n31/02/2023,10,Food\n").unwrap();

    let err = commands::load_transactions(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("operations.csv"));
}

#[test]
fn test_load_transactions_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("operations.xlsx");
    std::fs::write(&path, "").unwrap();

    assert!(commands::load_transactions(Some(&path)).is_err());
}

#[test]
fn test_load_settings_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(commands::load_settings(Some(&missing)).is_err());
}

#[test]
fn test_load_settings_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.toml");
    std::fs::write(&path, "[search]\ntransfer_category = \"Переводы\"\n").unwrap();

    let settings = commands::load_settings(Some(&path)).unwrap();
    assert_eq!(settings.transfer_category, "Переводы");
}

// ========== Service Command Tests ==========

#[test]
fn test_cmd_cashback() {
    let transactions = sample_transactions();
    let result =
        commands::cmd_cashback(&transactions, &CashbackPolicy::default(), 2023, 6, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_invest_invalid_limit() {
    let transactions = sample_transactions();
    let err = commands::cmd_invest(&transactions, "2023-06", 0.0).unwrap_err();
    assert!(err.to_string().contains("Invalid limit"));
}

#[test]
fn test_cmd_search_saves_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coffee.csv");
    let transactions = sample_transactions();

    commands::cmd_search(&transactions, "coffee", &save_to(path.clone())).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = saved.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("date,amount,category"));
}

#[test]
fn test_cmd_transfers_saves_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transfers.json");
    let transactions = sample_transactions();

    commands::cmd_transfers(&transactions, "Transfers", &save_to(path.clone())).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 2);
    assert_eq!(saved[0]["description"], "Валерий А.");
}

#[test]
fn test_cmd_phones_without_output_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let transactions = sample_transactions();

    commands::cmd_phones(&transactions, &OutputArgs::default()).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_report_weekdays_saves_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let transactions = sample_transactions();

    commands::cmd_report_weekdays(
        &transactions,
        date(2023, 7, 15),
        &save_to(dir.path().to_path_buf()),
    )
    .unwrap();

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("report_weekdays_"));
    assert!(files[0].ends_with(".json"));
}

#[test]
fn test_cmd_report_category_saves_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supermarkets.json");
    let transactions = sample_transactions();

    commands::cmd_report_category(
        &transactions,
        "Supermarkets",
        date(2023, 7, 15),
        &save_to(path.clone()),
    )
    .unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["category"], "Supermarkets");
    assert_eq!(saved["monthly_totals"]["2023-06"], 1712.0);
}

#[test]
fn test_cmd_report_work_weekend_and_summary() {
    let transactions = sample_transactions();
    let reference = date(2023, 7, 15);

    assert!(
        commands::cmd_report_work_weekend(&transactions, reference, &OutputArgs::default()).is_ok()
    );
    let json = OutputArgs {
        json: true,
        output: None,
    };
    assert!(commands::cmd_report_summary(&transactions, reference, Period::All, &json).is_ok());
}

#[test]
fn test_cmd_report_empty_data() {
    let result =
        commands::cmd_report_weekdays(&[], date(2023, 7, 15), &OutputArgs::default());
    assert!(result.is_ok());
}

// ========== Page Command Tests ==========

#[tokio::test]
async fn test_cmd_home_offline() {
    let transactions = sample_transactions();
    let settings = Settings::default();
    let market = commands::market_for(&settings, true).unwrap();
    let reference = date(2023, 6, 20).and_hms_opt(10, 0, 0).unwrap();

    let result =
        commands::cmd_home(&transactions, reference, &settings, market.as_ref(), false).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_events_json() {
    let transactions = sample_transactions();
    let settings = Settings::default();
    let market = StaticMarketData::new(
        [("USD".to_string(), 80.0)].into(),
        Default::default(),
    );
    let reference = date(2023, 6, 30).and_hms_opt(12, 0, 0).unwrap();

    let result = commands::cmd_events(
        &transactions,
        reference,
        Period::Month,
        &settings,
        &market,
        true,
    )
    .await;
    assert!(result.is_ok());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long description", 10), "a very ...");
    // Multi-byte text is cut on character boundaries
    assert_eq!(truncate("Яндекс Такси Москва", 9), "Яндекс...");
}
