/// Token metadata, price ids and historical prices
///
/// - `types` - balances, details, prices and output rows
/// - `metadata` - `TokenMetadataResolver` (mint → name/symbol)
/// - `coin_list` - local CoinGecko list (symbol/address → coin id)
/// - `prices` - `PriceResolver` ((coin id, date) → USD price)
pub mod coin_list;
pub mod metadata;
pub mod prices;
pub mod types;

pub use coin_list::CoinList;
pub use metadata::{TokenListSource, TokenMetadataResolver};
pub use prices::{to_upstream_date, PriceHistorySource, PriceResolver};
pub use types::{OutputRow, Price, TokenAccountBalance, TokenBalance, TokenDetails, TokenKind, UNKNOWN};
