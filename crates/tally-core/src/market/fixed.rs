//! Fixed-quote provider
//!
//! Serves quotes from memory. Used for `--offline` runs and in tests where
//! no network is available.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{MarketData, Quotes};

#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    rates: Quotes,
    prices: Quotes,
    /// When set, every call fails as if the upstream were down
    fail: bool,
}

impl StaticMarketData {
    pub fn new(rates: Quotes, prices: Quotes) -> Self {
        Self {
            rates,
            prices,
            fail: false,
        }
    }

    /// A provider with no quotes at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A provider whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn pick(&self, table: &Quotes, codes: &[String]) -> Result<Quotes> {
        if self.fail {
            return Err(Error::ExternalServiceUnavailable(
                "static provider configured to fail".into(),
            ));
        }
        Ok(codes
            .iter()
            .filter_map(|code| table.get(code).map(|price| (code.clone(), *price)))
            .collect())
    }
}

#[async_trait]
impl MarketData for StaticMarketData {
    async fn currency_rates(&self, codes: &[String]) -> Result<Quotes> {
        self.pick(&self.rates, codes)
    }

    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes> {
        self.pick(&self.prices, symbols)
    }
}
