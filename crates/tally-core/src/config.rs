//! Settings for Tally
//!
//! Loaded with a two-layer resolution:
//! 1. Explicit `--config` path, or the override in the config dir
//!    (~/.config/tally/config.toml)
//! 2. Embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values. A few
//! environment variables (`TALLY_DATA`, `TALLY_CURRENCY_URL`,
//! `TALLY_STOCK_URL`) are applied last.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::cashback::{CashbackPolicy, DEFAULT_FLAT_RATE};
use crate::error::{Error, Result};
use crate::search::DEFAULT_TRANSFER_CATEGORY;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

pub const ENV_DATA: &str = "TALLY_DATA";
pub const ENV_CURRENCY_URL: &str = "TALLY_CURRENCY_URL";
pub const ENV_STOCK_URL: &str = "TALLY_STOCK_URL";

/// Market-data endpoints and client behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSettings {
    pub currency_url: String,
    pub stock_url: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// How long cached quotes stay fresh
    pub cache_ttl: Duration,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            currency_url: "https://api.exchangerate.host/latest".to_string(),
            stock_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Everything the analyzer needs that isn't transaction data
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Currency codes shown on pages
    pub currencies: Vec<String>,
    /// Stock symbols shown on pages
    pub stocks: Vec<String>,
    pub cashback: CashbackPolicy,
    /// Cashback rate applied to per-card spending on the home page
    pub card_cashback_rate: f64,
    pub transfer_category: String,
    pub market: MarketSettings,
    /// Default transaction file
    pub data_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currencies: vec!["USD".to_string(), "EUR".to_string()],
            stocks: Vec::new(),
            cashback: CashbackPolicy::default(),
            card_cashback_rate: 0.01,
            transfer_category: DEFAULT_TRANSFER_CATEGORY.to_string(),
            market: MarketSettings::default(),
            data_path: None,
        }
    }
}

impl Settings {
    /// Load settings (override first, then embedded default), then apply
    /// environment overrides
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut settings = load_settings(override_path)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA).filter(|v| !v.is_empty()) {
            self.data_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(ENV_CURRENCY_URL).filter(|v| !v.is_empty()) {
            self.market.currency_url = url;
        }
        if let Some(url) = lookup(ENV_STOCK_URL).filter(|v| !v.is_empty()) {
            self.market.stock_url = url;
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}

fn load_settings(override_path: Option<&Path>) -> Result<Settings> {
    let path = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        return parse_settings(DEFAULT_CONFIG);
    };

    debug!(path = %path.display(), "Loading config override");
    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

    // Overrides are layered over the embedded file, not over struct defaults
    let mut settings = parse_settings(DEFAULT_CONFIG)?;
    apply_raw(&mut settings, parse_raw(&content)?)?;
    Ok(settings)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    user: Option<RawUser>,
    cashback: Option<RawCashback>,
    search: Option<RawSearch>,
    market: Option<RawMarket>,
    data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    currencies: Option<Vec<String>>,
    stocks: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawCashback {
    policy: Option<String>,
    rate: Option<f64>,
    card_rate: Option<f64>,
    rules: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    transfer_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMarket {
    currency_url: Option<String>,
    stock_url: Option<String>,
    timeout_secs: Option<u64>,
    cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    path: Option<PathBuf>,
}

fn parse_raw(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

/// Parse settings from TOML content over the built-in defaults
pub fn parse_settings(content: &str) -> Result<Settings> {
    let mut settings = Settings::default();
    apply_raw(&mut settings, parse_raw(content)?)?;
    Ok(settings)
}

fn apply_raw(settings: &mut Settings, raw: RawConfig) -> Result<()> {
    if let Some(user) = raw.user {
        if let Some(currencies) = user.currencies {
            settings.currencies = currencies;
        }
        if let Some(stocks) = user.stocks {
            settings.stocks = stocks;
        }
    }

    if let Some(cashback) = raw.cashback {
        if let Some(card_rate) = cashback.card_rate {
            check_rate("cashback.card_rate", card_rate)?;
            settings.card_cashback_rate = card_rate;
        }

        // Keep the current policy's values for keys the override leaves out
        let (current_rate, current_rules) = match &settings.cashback {
            CashbackPolicy::Flat { rate } => (*rate, BTreeMap::new()),
            CashbackPolicy::Rules { rates } => (DEFAULT_FLAT_RATE, rates.clone()),
        };
        let policy = cashback.policy.unwrap_or_else(|| match settings.cashback {
            CashbackPolicy::Flat { .. } => "flat".to_string(),
            CashbackPolicy::Rules { .. } => "rules".to_string(),
        });

        settings.cashback = match policy.as_str() {
            "flat" => {
                let rate = cashback.rate.unwrap_or(current_rate);
                check_rate("cashback.rate", rate)?;
                CashbackPolicy::Flat { rate }
            }
            "rules" => {
                let rates = cashback.rules.unwrap_or(current_rules);
                for (category, rate) in &rates {
                    check_rate(&format!("cashback.rules.{}", category), *rate)?;
                }
                CashbackPolicy::Rules { rates }
            }
            other => {
                return Err(Error::Config(format!(
                    "Unknown cashback policy '{}' (expected \"flat\" or \"rules\")",
                    other
                )))
            }
        };
    }

    if let Some(search) = raw.search {
        if let Some(category) = search.transfer_category {
            settings.transfer_category = category;
        }
    }

    if let Some(market) = raw.market {
        if let Some(url) = market.currency_url {
            settings.market.currency_url = url;
        }
        if let Some(url) = market.stock_url {
            settings.market.stock_url = url;
        }
        if let Some(secs) = market.timeout_secs {
            settings.market.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = market.cache_ttl_secs {
            settings.market.cache_ttl = Duration::from_secs(secs);
        }
    }

    if let Some(data) = raw.data {
        if let Some(path) = data.path {
            settings.data_path = Some(path);
        }
    }

    Ok(())
}

fn check_rate(key: &str, rate: f64) -> Result<()> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be a non-negative number", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let settings = parse_settings(DEFAULT_CONFIG).unwrap();
        assert_eq!(settings.currencies, vec!["USD", "EUR"]);
        assert!(settings.stocks.contains(&"AAPL".to_string()));
        assert_eq!(settings.cashback, CashbackPolicy::Flat { rate: 0.05 });
        assert_eq!(settings.card_cashback_rate, 0.01);
        assert_eq!(settings.transfer_category, "Transfers");
        assert_eq!(settings.market.timeout, Duration::from_secs(5));
        assert!(settings.data_path.is_none());
    }

    #[test]
    fn test_rules_policy() {
        let settings = parse_settings(
            r#"
            [cashback]
            policy = "rules"
            rules = { Tech = 0.05, Food = 0.01 }
            "#,
        )
        .unwrap();
        assert_eq!(settings.cashback.rate_for("Tech"), 0.05);
        assert_eq!(settings.cashback.rate_for("Travel"), 0.0);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = parse_settings("[cashback]\npolicy = \"tiered\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = parse_settings("[cashback]\nrate = -0.1\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_settings("[user\ncurrencies = 1").unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_override_file_layers_over_embedded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[user]\nstocks = [\"NVDA\"]\n\n[search]\ntransfer_category = \"Переводы\"").unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.stocks, vec!["NVDA"]);
        assert_eq!(settings.transfer_category, "Переводы");
        // Untouched keys come from the embedded file
        assert_eq!(settings.currencies, vec!["USD", "EUR"]);
        assert_eq!(settings.market.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/tally.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            ENV_DATA => Some("/tmp/ops.csv".to_string()),
            ENV_STOCK_URL => Some("http://127.0.0.1:9000/chart".to_string()),
            ENV_CURRENCY_URL => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.data_path, Some(PathBuf::from("/tmp/ops.csv")));
        assert_eq!(settings.market.stock_url, "http://127.0.0.1:9000/chart");
        assert_eq!(
            settings.market.currency_url,
            MarketSettings::default().currency_url
        );
    }
}
