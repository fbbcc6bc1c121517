/// Locally held CoinGecko coin list for symbol/address → coin id lookups
///
/// Loaded once from disk; lookups never touch the network. Refresh the file
/// with the `fetch-coin-list` command.
use crate::apis::coingecko::types::CoinGeckoCoin;
use crate::logger::{self, LogTag};
use crate::tokens::types::UNKNOWN;
use std::fs;
use std::io;
use std::path::Path;

/// Platform key CoinGecko uses for Solana contract addresses
const SOLANA_PLATFORM: &str = "solana";

#[derive(Debug, Clone, Default)]
pub struct CoinList {
    coins: Vec<CoinGeckoCoin>,
}

impl CoinList {
    pub fn new(coins: Vec<CoinGeckoCoin>) -> Self {
        Self { coins }
    }

    /// Load from `path`; a missing or unreadable file gives an empty list
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let coins = match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<Vec<CoinGeckoCoin>>(&data) {
                Ok(coins) => {
                    logger::debug(
                        LogTag::Prices,
                        &format!("Loaded {} coins from {}", coins.len(), path.display()),
                    );
                    coins
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Prices,
                        &format!("Malformed coin list {}: {}", path.display(), e),
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger::warning(
                    LogTag::Prices,
                    &format!(
                        "Coin list {} not found, every price id will be Unknown (run fetch-coin-list)",
                        path.display()
                    ),
                );
                Vec::new()
            }
            Err(e) => {
                logger::warning(
                    LogTag::Prices,
                    &format!("Failed to read coin list {}: {}", path.display(), e),
                );
                Vec::new()
            }
        };

        Self { coins }
    }

    /// Write `coins` pretty-printed to `path`
    pub fn save<P: AsRef<Path>>(coins: &[CoinGeckoCoin], path: P) -> Result<(), String> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(coins)
            .map_err(|e| format!("Failed to serialize coin list: {}", e))?;
        fs::write(path, data).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Coin id for a Solana token, or `"Unknown"`
    ///
    /// The Solana contract address is matched first; otherwise the first coin
    /// whose symbol equals `symbol` case-insensitively wins.
    pub fn resolve_id_by_symbol_or_address(&self, symbol: &str, address: &str) -> String {
        if !address.is_empty() {
            if let Some(coin) = self
                .coins
                .iter()
                .find(|coin| coin.platform_address(SOLANA_PLATFORM) == Some(address))
            {
                return coin.id.clone();
            }
        }

        self.resolve_id_by_symbol(symbol)
    }

    pub fn resolve_id_by_symbol(&self, symbol: &str) -> String {
        let symbol = symbol.trim();
        if symbol.is_empty() || symbol == UNKNOWN {
            return UNKNOWN.to_string();
        }

        self.coins
            .iter()
            .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
            .map(|coin| coin.id.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}
