use serde::{Deserialize, Serialize};

/// One entry of the Jupiter bulk token list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JupiterToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
