//! Shared command utilities
//!
//! This module contains:
//! - `load_settings` / `load_transactions` - Open the config and the data file
//! - `market_for` - Pick the market-data provider
//! - `parse_*_arg` - Date, datetime and period arguments
//! - `print_json` / `save_report` - Output helpers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tally_core::{
    default_report_filename, source_for_path, write_json, HttpMarketData, MarketData, Period,
    Settings, StaticMarketData, Transaction,
};
use tracing::debug;

/// Load settings from `--config`, the user config dir, or the built-in defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load(config).context("Failed to load settings")
}

/// Load every transaction from the data file
pub fn load_transactions(data: Option<&Path>) -> Result<Vec<Transaction>> {
    let Some(path) = data else {
        bail!(
            "No transaction file. Pass --data FILE, set TALLY_DATA, \
             or set [data] path in the config"
        );
    };

    let source = source_for_path(path)?;
    let transactions = source
        .load()
        .with_context(|| format!("Failed to load transactions from {}", path.display()))?;

    debug!(path = %path.display(), count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

/// Live market data, or an empty provider with `--offline`
pub fn market_for(settings: &Settings, offline: bool) -> Result<Box<dyn MarketData>> {
    if offline {
        return Ok(Box::new(StaticMarketData::empty()));
    }
    let market =
        HttpMarketData::new(&settings.market).context("Failed to create market-data client")?;
    Ok(Box::new(market))
}

/// Parse `--datetime`; defaults to now
pub fn parse_datetime_arg(value: Option<&str>) -> Result<NaiveDateTime> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(Local::now().naive_local());
    };

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .with_context(|| {
            format!(
                "Invalid --datetime '{}' (use YYYY-MM-DD HH:MM:SS)",
                value
            )
        })
}

/// Parse `--date`; defaults to today
pub fn parse_date_arg(value: Option<&str>) -> Result<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse `--range` (D, W, M, Y, ALL)
pub fn parse_period_arg(value: &str) -> Result<Period> {
    Ok(value.trim().parse::<Period>()?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Save a report as JSON. A directory target gets `report_<name>_<timestamp>.json`.
pub fn save_report<T: Serialize + ?Sized>(name: &str, value: &T, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(default_report_filename(name, Local::now().naive_local()))
    } else {
        target.to_path_buf()
    };

    write_json(value, &path)
        .with_context(|| format!("Failed to save report to {}", path.display()))?;
    println!("💾 Saved to {}", path.display());
    Ok(path)
}
