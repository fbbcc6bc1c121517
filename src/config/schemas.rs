/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined with the `config_struct!` macro, so a config file
/// only needs the values it wants to change.
use crate::config_struct;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// Solana JSON-RPC endpoint configuration
    pub struct RpcConfig {
        url: String = "https://api.mainnet-beta.solana.com".to_string(),
        commitment: String = "confirmed".to_string(),
        /// Also query Token-2022 accounts
        include_token_2022: bool = false,
    }
}

// ============================================================================
// HTTP RETRY CONFIGURATION
// ============================================================================

config_struct! {
    /// Timeout and retry settings shared by all outbound HTTP calls
    pub struct HttpConfig {
        timeout_secs: u64 = 20,
        /// Total attempts for transient failures and bounded 429 retries
        max_attempts: u32 = 3,
        base_delay_ms: u64 = 1000,
        max_delay_ms: u64 = 30_000,
        /// Fraction of each backoff delay added as random jitter (0.0 - 0.5)
        backoff_jitter: f64 = 0.0,
    }
}

// ============================================================================
// TOKEN METADATA CONFIGURATION
// ============================================================================

config_struct! {
    pub struct MetadataConfig {
        /// Bulk token list, scanned locally for a mint address
        token_list_url: String = "https://token.jup.ag/all".to_string(),
    }
}

// ============================================================================
// PRICE CONFIGURATION
// ============================================================================

config_struct! {
    /// Historical price service configuration
    pub struct PricesConfig {
        coingecko_base_url: String = "https://api.coingecko.com/api/v3".to_string(),
        /// Sent as `x-cg-demo-api-key` when set
        api_key: Option<String> = None,
        /// Wait used when a 429 carries no Retry-After header
        rate_limit_fallback_secs: u64 = 62,
        /// Price id used for the native SOL row
        native_price_id: String = "solana".to_string(),
        /// Overrides the default coin list location under the data directory
        coin_list_path: Option<String> = None,
        /// Overrides the default price cache location under the data directory
        cache_path: Option<String> = None,
    }
}

// ============================================================================
// EXPORT CONFIGURATION
// ============================================================================

config_struct! {
    /// Row filters and output location
    pub struct ExportConfig {
        /// Drop balances of exactly 0 or 1
        skip_dust_balances: bool = true,
        /// Drop token rows whose name could not be resolved
        skip_unknown_tokens: bool = true,
        output_dir: Option<String> = None,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        http: HttpConfig = HttpConfig::default(),
        metadata: MetadataConfig = MetadataConfig::default(),
        prices: PricesConfig = PricesConfig::default(),
        export: ExportConfig = ExportConfig::default(),
    }
}
