/// Wiring of clients, resolvers and the aggregator from a `Config`
use crate::apis::{CoinGeckoClient, JupiterClient, SolanaRpcClient};
use crate::balances::{BalanceAggregator, BalanceFilter};
use crate::cache::PriceCache;
use crate::config::Config;
use crate::http::{HttpTransport, RateLimitedHttpClient, ReqwestTransport, RetryPolicy};
use crate::paths;
use crate::tokens::{CoinList, PriceResolver, TokenMetadataResolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct Services {
    pub coingecko: Arc<CoinGeckoClient>,
    pub jupiter: Arc<JupiterClient>,
    pub rpc: Arc<SolanaRpcClient>,
    coin_list_path: PathBuf,
    price_cache_path: PathBuf,
    native_price_id: String,
    filter: BalanceFilter,
}

impl Services {
    /// Real HTTP transport with the configured timeout
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let transport = ReqwestTransport::new(config.http.timeout_secs)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let http = RateLimitedHttpClient::new(transport, RetryPolicy::from_config(&config.http));
        let history_http = http.with_policy(RetryPolicy::price_history(Duration::from_secs(
            config.prices.rate_limit_fallback_secs,
        )));

        let coingecko = CoinGeckoClient::new(
            http.clone(),
            history_http,
            config.prices.coingecko_base_url.as_str(),
            config.prices.api_key.clone(),
        );
        let jupiter = JupiterClient::new(http.clone(), config.metadata.token_list_url.as_str());
        let rpc = SolanaRpcClient::new(
            http,
            config.rpc.url.as_str(),
            config.rpc.commitment.as_str(),
            config.rpc.include_token_2022,
        );

        Self {
            coingecko: Arc::new(coingecko),
            jupiter: Arc::new(jupiter),
            rpc: Arc::new(rpc),
            coin_list_path: config
                .prices
                .coin_list_path
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(paths::get_coin_list_path),
            price_cache_path: config
                .prices
                .cache_path
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(paths::get_price_cache_path),
            native_price_id: config.prices.native_price_id.clone(),
            filter: BalanceFilter::from_config(&config.export),
        }
    }

    pub fn coin_list_path(&self) -> &PathBuf {
        &self.coin_list_path
    }

    pub fn price_cache_path(&self) -> &PathBuf {
        &self.price_cache_path
    }

    pub fn load_coin_list(&self) -> CoinList {
        CoinList::load(&self.coin_list_path)
    }

    /// Price resolver over the persisted cache
    pub fn price_resolver(&self) -> PriceResolver {
        PriceResolver::new(self.coingecko.clone(), PriceCache::load(&self.price_cache_path))
    }

    pub fn aggregator(&self) -> BalanceAggregator {
        BalanceAggregator::new(
            self.rpc.clone(),
            Arc::new(TokenMetadataResolver::new(self.jupiter.clone())),
            Arc::new(self.load_coin_list()),
            Arc::new(self.price_resolver()),
            self.filter,
            self.native_price_id.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::tokens::Price;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.rpc.url = "https://rpc.test".to_string();
        config.prices.coingecko_base_url = "https://cg.test/api/v3".to_string();
        config.prices.coin_list_path = Some(dir.path().join("list.json").display().to_string());
        config.prices.cache_path = Some(dir.path().join("cache.json").display().to_string());
        config
    }

    #[test]
    fn test_paths_follow_config_overrides() {
        let dir = TempDir::new().unwrap();
        let services = Services::with_transport(
            &config_in(&dir),
            Arc::new(ScriptedTransport::new(Vec::new())),
        );
        assert_eq!(services.coin_list_path(), &dir.path().join("list.json"));
        assert_eq!(services.price_cache_path(), &dir.path().join("cache.json"));
        assert!(services.load_coin_list().is_empty());
    }

    #[tokio::test]
    async fn test_export_pipeline_over_scripted_http() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("list.json"),
            r#"[{"id":"solana","symbol":"sol","name":"Solana","platforms":{}}]"#,
        )
        .unwrap();

        let transport = Arc::new(ScriptedTransport::new(vec![
            ScriptedTransport::ok(
                200,
                r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":[]}}"#,
            ),
            ScriptedTransport::ok(
                200,
                r#"{"jsonrpc":"2.0","id":2,"result":{"context":{"slot":1},"value":1500000000}}"#,
            ),
            ScriptedTransport::ok(
                200,
                r#"{"id":"solana","market_data":{"current_price":{"usd":100.0}}}"#,
            ),
        ]));
        let services = Services::with_transport(&config_in(&dir), transport.clone());

        let rows = services
            .aggregator()
            .aggregate("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", "2024-01-15")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].balance.amount, 1.5);
        assert_eq!(rows[0].price, Price::Usd(100.0));
        assert_eq!(transport.calls(), 3);
        assert!(dir.path().join("cache.json").exists());
    }
}
