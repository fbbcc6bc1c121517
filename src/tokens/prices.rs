/// Historical USD prices by `(token id, date)` backed by the disk cache
use crate::cache::PriceCache;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use crate::tokens::types::{Price, UNKNOWN};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Upstream for one day's USD price of a coin
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// `upstream_date` is `DD-MM-YYYY`
    async fn price_on(&self, coin_id: &str, upstream_date: &str) -> Result<f64, FetchError>;
}

/// `YYYY-MM-DD` → `DD-MM-YYYY`; `None` if `date` is not a calendar date
pub fn to_upstream_date(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%d-%m-%Y").to_string())
}

type PendingPrice = Shared<BoxFuture<'static, Price>>;

struct PriceState {
    cache: PriceCache,
    in_flight: HashMap<String, PendingPrice>,
}

pub struct PriceResolver {
    source: Arc<dyn PriceHistorySource>,
    state: Mutex<PriceState>,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PriceHistorySource>, cache: PriceCache) -> Self {
        Self {
            source,
            state: Mutex::new(PriceState {
                cache,
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Price of `token_id` on `date` (`YYYY-MM-DD`); never fails
    ///
    /// Every upstream answer, including Unknown, is cached and persisted
    /// before returning. Concurrent misses on the same key share one request,
    /// and the lock is not held while it runs.
    pub async fn resolve(&self, token_id: &str, date: &str) -> Price {
        if token_id == UNKNOWN {
            return Price::Unknown;
        }

        let date = date.trim();
        let key = PriceCache::key(token_id, date);

        let pending = {
            let mut state = self.state.lock().await;
            if let Some(price) = state.cache.get(&key) {
                logger::debug(LogTag::Prices, &format!("Cache hit {} = {}", key, price));
                return price;
            }
            match state.in_flight.get(&key) {
                Some(pending) => {
                    logger::debug(LogTag::Prices, &format!("Joining in-flight lookup for {}", key));
                    pending.clone()
                }
                None => {
                    let upstream_date = match to_upstream_date(date) {
                        Some(upstream_date) => upstream_date,
                        None => {
                            logger::warning(
                                LogTag::Prices,
                                &format!("Invalid date '{}' for {}, expected YYYY-MM-DD", date, token_id),
                            );
                            return Price::Unknown;
                        }
                    };
                    let pending = self.start_lookup(token_id, date, upstream_date);
                    state.in_flight.insert(key.clone(), pending.clone());
                    pending
                }
            }
        };

        let fetched = pending.await;

        let mut state = self.state.lock().await;
        if state.in_flight.remove(&key).is_none() {
            // Another caller of the same lookup already stored it
            return state.cache.get(&key).unwrap_or(fetched);
        }
        let stored = state.cache.insert(key, fetched);
        if let Err(e) = state.cache.persist() {
            logger::warning(LogTag::Cache, &format!("Price cache not saved: {}", e));
        }
        stored
    }

    pub async fn cached_count(&self) -> usize {
        self.state.lock().await.cache.len()
    }

    fn start_lookup(&self, token_id: &str, date: &str, upstream_date: String) -> PendingPrice {
        let source = Arc::clone(&self.source);
        let token_id = token_id.to_string();
        let date = date.to_string();

        async move {
            match source.price_on(&token_id, &upstream_date).await {
                Ok(usd) => {
                    logger::info(
                        LogTag::Prices,
                        &format!("Price for '{}' on {}: {}", token_id, date, usd),
                    );
                    Price::Usd(usd)
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Prices,
                        &format!("Error fetching price for '{}' on {}: {}", token_id, date, e),
                    );
                    Price::Unknown
                }
            }
        }
        .boxed()
        .shared()
    }
}
