//! HTTP market-data provider
//!
//! Currency rates: `GET {currency_url}?base=RUB` returning
//! `{"rates": {"USD": 0.0125, ...}}` (units per RUB, inverted on the way out).
//!
//! Stock quotes: `GET {stock_url}/{symbol}` returning a chart document with
//! the price at `chart.result[0].meta.regularMarketPrice`.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::debug;

use crate::config::MarketSettings;
use crate::error::{Error, Result};

use super::{MarketData, Quotes};

const BASE_CURRENCY: &str = "RUB";

/// Market data over HTTP
#[derive(Clone)]
pub struct HttpMarketData {
    http_client: Client,
    currency_url: String,
    stock_url: String,
}

impl HttpMarketData {
    /// Create a provider for the configured endpoints. Every call is bounded
    /// by `settings.timeout`.
    pub fn new(settings: &MarketSettings) -> Result<Self> {
        let http_client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http_client,
            currency_url: settings.currency_url.trim_end_matches('/').to_string(),
            stock_url: settings.stock_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_rates(&self, codes: &[String]) -> Result<Quotes> {
        let response = self
            .http_client
            .get(&self.currency_url)
            .query(&[("base", BASE_CURRENCY)])
            .send()
            .await?
            .error_for_status()?;

        let body: RatesResponse = response.json().await?;
        debug!(returned = body.rates.len(), "Currency rates response");

        let mut quotes = Quotes::new();
        for code in codes {
            match body.rates.get(code) {
                Some(rate) if *rate > 0.0 => {
                    quotes.insert(code.clone(), 1.0 / rate);
                }
                _ => {
                    return Err(Error::ExternalServiceUnavailable(format!(
                        "no {} rate for {}",
                        BASE_CURRENCY, code
                    )))
                }
            }
        }
        Ok(quotes)
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.stock_url, symbol))
            .send()
            .await?
            .error_for_status()?;

        let body: ChartResponse = response.json().await?;
        body.chart
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.meta.regular_market_price)
            .ok_or_else(|| {
                Error::ExternalServiceUnavailable(format!("no price in quote for {}", symbol))
            })
    }
}

fn unavailable(what: &str, e: Error) -> Error {
    match e {
        Error::ExternalServiceUnavailable(_) => e,
        other => Error::ExternalServiceUnavailable(format!("{}: {}", what, other)),
    }
}

#[async_trait]
impl MarketData for HttpMarketData {
    async fn currency_rates(&self, codes: &[String]) -> Result<Quotes> {
        self.fetch_rates(codes)
            .await
            .map_err(|e| unavailable("currency rates", e))
    }

    /// Symbols are fetched concurrently, so the whole call is bounded by one
    /// request timeout. The first failure aborts the remaining requests.
    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes> {
        let mut tasks = JoinSet::new();
        for symbol in symbols {
            let provider = self.clone();
            let symbol = symbol.clone();
            tasks.spawn(async move {
                let price = provider.fetch_price(&symbol).await;
                (symbol, price)
            });
        }

        let mut quotes = Quotes::new();
        while let Some(joined) = tasks.join_next().await {
            let (symbol, price) = joined.map_err(|e| {
                Error::ExternalServiceUnavailable(format!("stock price task failed: {}", e))
            })?;
            let price = price.map_err(|e| unavailable("stock prices", e))?;
            quotes.insert(symbol, price);
        }
        Ok(quotes)
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}
