/// Mint address → `{name, symbol}` with in-memory caching and in-flight dedup
///
/// Every result, including `Unknown`, is kept for the life of the resolver.
/// Concurrent lookups of the same mint share one upstream request.
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use crate::tokens::types::TokenDetails;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Upstream that can describe a mint
#[async_trait]
pub trait TokenListSource: Send + Sync {
    /// `FetchError::NotFound` when the mint is not listed
    async fn lookup(&self, mint: &str) -> Result<TokenDetails, FetchError>;
}

type PendingLookup = Shared<BoxFuture<'static, TokenDetails>>;

#[derive(Default)]
struct MetadataState {
    resolved: HashMap<String, TokenDetails>,
    in_flight: HashMap<String, PendingLookup>,
}

pub struct TokenMetadataResolver {
    source: Arc<dyn TokenListSource>,
    state: Mutex<MetadataState>,
}

impl TokenMetadataResolver {
    pub fn new(source: Arc<dyn TokenListSource>) -> Self {
        Self {
            source,
            state: Mutex::new(MetadataState::default()),
        }
    }

    /// Never fails; lookup errors resolve (and are cached) as Unknown
    pub async fn resolve(&self, mint: &str) -> TokenDetails {
        let pending = {
            let mut state = self.state.lock().await;
            if let Some(details) = state.resolved.get(mint) {
                return details.clone();
            }
            match state.in_flight.get(mint) {
                Some(pending) => {
                    logger::debug(LogTag::Tokens, &format!("Joining in-flight lookup for {}", mint));
                    pending.clone()
                }
                None => {
                    let pending = self.start_lookup(mint);
                    state.in_flight.insert(mint.to_string(), pending.clone());
                    pending
                }
            }
        };

        let details = pending.await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(mint);
        state
            .resolved
            .entry(mint.to_string())
            .or_insert_with(|| details.clone())
            .clone()
    }

    /// Number of mints with a settled answer
    pub async fn cached_count(&self) -> usize {
        self.state.lock().await.resolved.len()
    }

    fn start_lookup(&self, mint: &str) -> PendingLookup {
        let source = Arc::clone(&self.source);
        let mint = mint.to_string();

        async move {
            match source.lookup(&mint).await {
                Ok(details) => {
                    logger::debug(
                        LogTag::Tokens,
                        &format!("{} → {} ({})", mint, details.name, details.symbol),
                    );
                    details
                }
                Err(e) if e.is_not_found() => {
                    logger::debug(LogTag::Tokens, &format!("{} is not in the token list", mint));
                    TokenDetails::unknown()
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Tokens,
                        &format!("Metadata lookup for {} failed, using Unknown: {}", mint, e),
                    );
                    TokenDetails::unknown()
                }
            }
        }
        .boxed()
        .shared()
    }
}
