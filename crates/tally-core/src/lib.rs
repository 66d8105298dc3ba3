//! Tally Core Library
//!
//! Shared functionality for the Tally transaction analyzer:
//! - Transaction model, validation and date windows
//! - Filter/group/reduce helpers behind every report
//! - Cashback, round-up savings, search and pattern matchers
//! - Spending reports and the home/events pages
//! - Pluggable transaction sources (CSV, JSON, memory)
//! - Pluggable market data (HTTP, cached, static)
//! - Settings loaded from TOML with embedded defaults
//! - Report persistence as an explicit second step

pub mod aggregate;
pub mod cashback;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod market;
pub mod models;
pub mod pages;
pub mod reports;
pub mod savings;
pub mod search;
pub mod window;

/// Test utilities including mock market-data server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cashback::{analyze_cashback, cashback_by_category, CashbackPolicy};
pub use config::{MarketSettings, Settings};
pub use error::{Error, Result};
pub use export::{default_report_filename, write_json, write_transactions_csv, ExportFormat};
pub use import::{source_for_path, CsvSource, JsonSource, MemorySource, TransactionSource};
pub use market::{CachedMarketData, HttpMarketData, MarketData, Quotes, StaticMarketData};
pub use models::*;
pub use pages::{events_page, greeting, home_page};
pub use reports::{
    category_spending_report, spending_summary, weekday_spending_report,
    work_weekend_spending_report,
};
pub use savings::investment_bank;
pub use search::{find_person_transfers, find_phone_transactions, simple_search};
pub use window::DateWindow;
