/// CoinGecko API client
///
/// API Documentation: https://docs.coingecko.com/reference/introduction
///
/// Endpoints implemented:
/// 1. /api/v3/coins/list?include_platform=true - All coins with platform addresses
/// 2. /api/v3/coins/{id}/history?date=DD-MM-YYYY - Historical snapshot for one day
pub mod types;

use self::types::{CoinGeckoCoin, CoinHistory};
use crate::errors::FetchError;
use crate::http::{HttpRequest, RateLimitedHttpClient};
use crate::logger::{self, LogTag};
use crate::tokens::prices::PriceHistorySource;
use async_trait::async_trait;
use std::time::Instant;

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a demo-tier API key
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

pub struct CoinGeckoClient {
    /// Used for `/coins/list` (standard retry policy)
    http: RateLimitedHttpClient,
    /// Used for `/coins/{id}/history` (unbounded 429 retry, no other retries)
    history_http: RateLimitedHttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(
        http: RateLimitedHttpClient,
        history_http: RateLimitedHttpClient,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            history_http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn request(&self, path: &str) -> HttpRequest {
        let request = HttpRequest::get(format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.with_header(API_KEY_HEADER, key.as_str()),
            None => request,
        }
    }

    /// Fetch all coins with platform addresses
    pub async fn fetch_coins_list(&self) -> Result<Vec<CoinGeckoCoin>, FetchError> {
        let start = Instant::now();
        let request = self.request("/coins/list?include_platform=true");
        let coins: Vec<CoinGeckoCoin> = self.http.request_json(&request).await?;

        logger::info(
            LogTag::Prices,
            &format!(
                "Fetched {} coins from CoinGecko in {}ms",
                coins.len(),
                start.elapsed().as_millis()
            ),
        );

        Ok(coins)
    }

    /// USD price of `coin_id` on `upstream_date` (`DD-MM-YYYY`)
    ///
    /// `FetchError::NotFound` when the snapshot has no USD price.
    pub async fn fetch_price_history(
        &self,
        coin_id: &str,
        upstream_date: &str,
    ) -> Result<f64, FetchError> {
        let request = self.request(&format!("/coins/{}/history?date={}", coin_id, upstream_date));
        let history: CoinHistory = self.history_http.request_json(&request).await?;

        history.usd_price().ok_or_else(|| {
            FetchError::NotFound(format!("no USD price for {} on {}", coin_id, upstream_date))
        })
    }

    /// Extract Solana token addresses with coin ids
    pub fn extract_solana_addresses(coins: &[CoinGeckoCoin]) -> Vec<(String, String)> {
        coins
            .iter()
            .filter_map(|coin| {
                coin.platform_address("solana")
                    .map(|address| (coin.id.clone(), address.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl PriceHistorySource for CoinGeckoClient {
    async fn price_on(&self, coin_id: &str, upstream_date: &str) -> Result<f64, FetchError> {
        self.fetch_price_history(coin_id, upstream_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::RetryPolicy;
    use std::sync::Arc;
    use std::time::Duration;

    fn make_client(transport: Arc<ScriptedTransport>, api_key: Option<&str>) -> CoinGeckoClient {
        let http = RateLimitedHttpClient::new(transport, RetryPolicy::standard());
        let history_http = http.with_policy(RetryPolicy::price_history(Duration::from_secs(62)));
        CoinGeckoClient::new(
            http,
            history_http,
            format!("{}/", COINGECKO_BASE_URL),
            api_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_fetch_price_history() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok(
            200,
            r#"{"id":"solana","symbol":"sol","market_data":{"current_price":{"usd":101.52,"eur":92.1}}}"#,
        )]));
        let client = make_client(transport.clone(), Some("demo-key"));

        let price = client.fetch_price_history("solana", "30-12-2023").await.unwrap();
        assert_eq!(price, 101.52);

        let request = &transport.requests()[0];
        assert_eq!(
            request.url,
            "https://api.coingecko.com/api/v3/coins/solana/history?date=30-12-2023"
        );
        assert!(request
            .headers
            .contains(&(API_KEY_HEADER.to_string(), "demo-key".to_string())));
    }

    #[tokio::test]
    async fn test_history_without_market_data_is_not_found() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok(
            200,
            r#"{"id":"newcoin","symbol":"new","name":"New"}"#,
        )]));
        let client = make_client(transport, None);

        let err = client.fetch_price_history("newcoin", "01-01-2020").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_coins_list_without_key() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok(
            200,
            r#"[{"id":"usd-coin","symbol":"usdc","name":"USDC","platforms":{"solana":"EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v","ethereum":""}},
                {"id":"bitcoin","symbol":"btc","name":"Bitcoin","platforms":{}}]"#,
        )]));
        let client = make_client(transport.clone(), Some("  "));

        let coins = client.fetch_coins_list().await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(
            CoinGeckoClient::extract_solana_addresses(&coins),
            vec![(
                "usd-coin".to_string(),
                "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string()
            )]
        );
        assert!(transport.requests()[0]
            .headers
            .iter()
            .all(|(name, _)| name != API_KEY_HEADER));
    }

    #[test]
    fn test_platform_address_skips_empty_and_null() {
        let coin: CoinGeckoCoin = serde_json::from_str(
            r#"{"id":"x","symbol":"x","name":"X","platforms":{"solana":"","ethereum":null}}"#,
        )
        .unwrap();
        assert_eq!(coin.platform_address("solana"), None);
        assert_eq!(coin.platform_address("ethereum"), None);
        assert_eq!(coin.platform_address("polygon-pos"), None);
    }
}
