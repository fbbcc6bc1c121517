use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry of `/coins/list?include_platform=true`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinGeckoCoin {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Chain name → contract address; values are sometimes empty or null
    #[serde(default)]
    pub platforms: Option<HashMap<String, Option<String>>>,
}

impl CoinGeckoCoin {
    /// Non-empty contract address on `chain`
    pub fn platform_address(&self, chain: &str) -> Option<&str> {
        self.platforms
            .as_ref()?
            .get(chain)?
            .as_deref()
            .filter(|address| !address.is_empty())
    }
}

/// Response of `/coins/{id}/history?date=DD-MM-YYYY`
///
/// `market_data` is absent for dates before the coin was listed.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinHistory {
    pub id: String,
    #[serde(default)]
    pub market_data: Option<HistoryMarketData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
}

impl CoinHistory {
    pub fn usd_price(&self) -> Option<f64> {
        self.market_data
            .as_ref()?
            .current_price
            .get("usd")
            .copied()
    }
}
