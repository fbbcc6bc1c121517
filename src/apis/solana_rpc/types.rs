use serde::Deserialize;

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `{ context, value }` wrapper used by most account queries
#[derive(Debug, Deserialize)]
pub struct RpcContextual<T> {
    pub value: T,
}

/// One element of `getTokenAccountsByOwner` with `jsonParsed` encoding
#[derive(Debug, Deserialize)]
pub struct KeyedTokenAccount {
    pub pubkey: String,
    pub account: TokenAccount,
}

#[derive(Debug, Deserialize)]
pub struct TokenAccount {
    pub data: TokenAccountData,
}

#[derive(Debug, Deserialize)]
pub struct TokenAccountData {
    pub parsed: ParsedTokenAccount,
}

#[derive(Debug, Deserialize)]
pub struct ParsedTokenAccount {
    pub info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub token_amount: UiTokenAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

impl UiTokenAmount {
    /// Decimal-adjusted amount
    ///
    /// Nodes send `uiAmount: null` for very large values; fall back to the
    /// string form, then to the raw amount scaled by `decimals`.
    pub fn ui_amount(&self) -> f64 {
        if let Some(value) = self.ui_amount {
            return value;
        }
        if let Some(value) = self
            .ui_amount_string
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
        {
            return value;
        }
        self.amount
            .parse::<f64>()
            .map(|raw| raw / 10f64.powi(self.decimals as i32))
            .unwrap_or(0.0)
    }
}
