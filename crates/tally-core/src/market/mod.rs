//! Market data: currency rates and stock prices
//!
//! Pages show a handful of quotes next to the spending figures. Quotes come
//! from a pluggable [`MarketData`] provider:
//!
//! - [`HttpMarketData`] calls the configured rates and quote endpoints
//! - [`CachedMarketData`] wraps any provider with a short TTL cache
//! - [`StaticMarketData`] returns fixed quotes (offline use, tests)
//!
//! Providers report every failure as `Error::ExternalServiceUnavailable`.
//! Pages never fail because of market data: they go through
//! [`fetch_or_empty`], which degrades to an empty mapping.

mod cache;
mod fixed;
mod http;

pub use cache::CachedMarketData;
pub use fixed::StaticMarketData;
pub use http::HttpMarketData;

use std::collections::BTreeMap;
use std::future::Future;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// Code (currency or ticker) to price
pub type Quotes = BTreeMap<String, f64>;

/// Source of currency rates and stock prices
#[async_trait]
pub trait MarketData: Send + Sync {
    /// RUB per one unit of each requested currency
    async fn currency_rates(&self, codes: &[String]) -> Result<Quotes>;

    /// Last price of each requested symbol
    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes>;
}

/// Await a market-data call, turning any failure into an empty mapping
pub async fn fetch_or_empty<F>(what: &str, fetch: F) -> Quotes
where
    F: Future<Output = Result<Quotes>>,
{
    match fetch.await {
        Ok(quotes) => quotes,
        Err(e) => {
            warn!(error = %e, "Market data unavailable, omitting {}", what);
            Quotes::new()
        }
    }
}

/// Currency rates for `codes`, empty on failure. No call is made for an empty list.
pub async fn currency_rates_or_empty(market: &dyn MarketData, codes: &[String]) -> Quotes {
    if codes.is_empty() {
        return Quotes::new();
    }
    fetch_or_empty("currency rates", market.currency_rates(codes)).await
}

/// Stock prices for `symbols`, empty on failure. No call is made for an empty list.
pub async fn stock_prices_or_empty(market: &dyn MarketData, symbols: &[String]) -> Quotes {
    if symbols.is_empty() {
        return Quotes::new();
    }
    fetch_or_empty("stock prices", market.stock_prices(symbols)).await
}
