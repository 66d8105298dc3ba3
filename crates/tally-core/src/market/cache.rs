//! TTL cache over any market-data provider
//!
//! Entries are keyed by endpoint and the exact list of requested codes. The
//! lock is only taken to read or store an entry, never across the upstream
//! call. When a refresh fails and an expired entry exists, the stale quotes
//! are served instead of the error.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::Result;

use super::{MarketData, Quotes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Endpoint {
    Currency,
    Stock,
}

type CacheKey = (Endpoint, Vec<String>);

struct CacheEntry {
    quotes: Quotes,
    fetched_at: Instant,
}

pub struct CachedMarketData<M> {
    inner: M,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl<M: MarketData> CachedMarketData<M> {
    pub fn new(inner: M, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn cached<F>(&self, endpoint: Endpoint, codes: &[String], fetch: F) -> Result<Quotes>
    where
        F: Future<Output = Result<Quotes>>,
    {
        let key: CacheKey = (endpoint, codes.to_vec());

        let stale = {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                    debug!(?endpoint, "Market data cache hit");
                    return Ok(entry.quotes.clone());
                }
                Some(entry) => Some(entry.quotes.clone()),
                None => None,
            }
        };

        match fetch.await {
            Ok(quotes) => {
                self.entries.write().await.insert(
                    key,
                    CacheEntry {
                        quotes: quotes.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Ok(quotes)
            }
            Err(e) => match stale {
                Some(quotes) => {
                    warn!(error = %e, ?endpoint, "Refresh failed, serving stale market data");
                    Ok(quotes)
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl<M: MarketData> MarketData for CachedMarketData<M> {
    async fn currency_rates(&self, codes: &[String]) -> Result<Quotes> {
        self.cached(Endpoint::Currency, codes, self.inner.currency_rates(codes))
            .await
    }

    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes> {
        self.cached(Endpoint::Stock, symbols, self.inner.stock_prices(symbols))
            .await
    }
}
