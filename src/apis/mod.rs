/// External API clients
///
/// - `coingecko` - coin list and historical USD prices
/// - `jupiter` - bulk token list for mint metadata
/// - `solana_rpc` - JSON-RPC balance queries
pub mod coingecko;
pub mod jupiter;
pub mod solana_rpc;

pub use coingecko::CoinGeckoClient;
pub use jupiter::JupiterClient;
pub use solana_rpc::SolanaRpcClient;
