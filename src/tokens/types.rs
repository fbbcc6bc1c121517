/// Core types shared by the resolvers, the aggregator and the exporter
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Placeholder for any value a lookup could not resolve
pub const UNKNOWN: &str = "Unknown";

// ============================================================================
// BALANCES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Token,
    Native,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Token => "Token",
            TokenKind::Native => "Native",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mint and decimal-adjusted amount as reported by the RPC node
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountBalance {
    pub mint: String,
    pub amount: f64,
}

/// A balance row after metadata resolution
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub mint: String,
    pub amount: f64,
    pub name: String,
    pub symbol: String,
    pub kind: TokenKind,
}

impl TokenBalance {
    /// Token row with resolved details
    pub fn token(mint: impl Into<String>, amount: f64, details: TokenDetails) -> Self {
        Self {
            mint: mint.into(),
            amount,
            name: details.name,
            symbol: details.symbol,
            kind: TokenKind::Token,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN
    }
}

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDetails {
    pub name: String,
    pub symbol: String,
}

impl TokenDetails {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN
    }
}

// ============================================================================
// PRICES
// ============================================================================

/// Historical USD price; `Unknown` is a real, cacheable answer
///
/// Serialized as a bare JSON number or the string `"Unknown"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Usd(f64),
    Unknown,
}

impl Price {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Price::Unknown)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Usd(value) => write!(f, "{}", value),
            Price::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Usd(value) => serializer.serialize_f64(*value),
            Price::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Price::Usd(value),
            Raw::Text(text) => text.parse::<f64>().map(Price::Usd).unwrap_or(Price::Unknown),
        })
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// One CSV row: a balance plus its price-service id and price
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub balance: TokenBalance,
    pub coingecko_id: Option<String>,
    pub price: Price,
}
