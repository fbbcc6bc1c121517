/// Jupiter token list client
///
/// Endpoint: `GET https://token.jup.ag/all` - the full verified+community list
/// as one JSON array. There is no per-mint endpoint, so lookups download the
/// list and scan it locally.
pub mod types;

use self::types::JupiterToken;
use crate::errors::FetchError;
use crate::http::RateLimitedHttpClient;
use crate::logger::{self, LogTag};
use crate::tokens::metadata::TokenListSource;
use crate::tokens::types::TokenDetails;
use async_trait::async_trait;
use std::time::Instant;

pub const DEFAULT_TOKEN_LIST_URL: &str = "https://token.jup.ag/all";

pub struct JupiterClient {
    http: RateLimitedHttpClient,
    token_list_url: String,
}

impl JupiterClient {
    pub fn new(http: RateLimitedHttpClient, token_list_url: impl Into<String>) -> Self {
        Self {
            http,
            token_list_url: token_list_url.into(),
        }
    }

    /// Download the full token list
    pub async fn fetch_token_list(&self) -> Result<Vec<JupiterToken>, FetchError> {
        let start = Instant::now();
        let tokens: Vec<JupiterToken> = self.http.get_json(&self.token_list_url).await?;

        logger::debug(
            LogTag::Tokens,
            &format!(
                "Fetched {} tokens from {} in {}ms",
                tokens.len(),
                self.token_list_url,
                start.elapsed().as_millis()
            ),
        );

        Ok(tokens)
    }

    /// Linear scan for an exact mint match
    pub fn find_token<'a>(tokens: &'a [JupiterToken], mint: &str) -> Option<&'a JupiterToken> {
        tokens.iter().find(|token| token.address == mint)
    }
}

#[async_trait]
impl TokenListSource for JupiterClient {
    async fn lookup(&self, mint: &str) -> Result<TokenDetails, FetchError> {
        let tokens = self.fetch_token_list().await?;
        match Self::find_token(&tokens, mint) {
            Some(token) => Ok(TokenDetails::new(&token.name, &token.symbol)),
            None => Err(FetchError::NotFound(format!("{} not in token list", mint))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::{HttpResponse, RetryPolicy, TransportError};
    use crate::tokens::metadata::TokenMetadataResolver;
    use std::sync::Arc;

    const LIST: &str = r#"[
        {"address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "name": "USD Coin", "symbol": "USDC", "decimals": 6, "logoURI": "https://x/usdc.png", "tags": ["verified"]},
        {"address": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "name": "Bonk", "symbol": "Bonk", "decimals": 5}
    ]"#;

    fn make_client(
        script: Vec<Result<HttpResponse, TransportError>>,
    ) -> (JupiterClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(script));
        let http = RateLimitedHttpClient::new(transport.clone(), RetryPolicy::standard());
        (JupiterClient::new(http, DEFAULT_TOKEN_LIST_URL), transport)
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let (client, transport) = make_client(vec![ScriptedTransport::ok(200, LIST)]);
        let details = client
            .lookup("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263")
            .await
            .unwrap();
        assert_eq!(details, TokenDetails::new("Bonk", "Bonk"));
        assert_eq!(transport.requests()[0].url, DEFAULT_TOKEN_LIST_URL);
    }

    #[tokio::test]
    async fn test_lookup_missing_is_not_found() {
        let (client, _) = make_client(vec![ScriptedTransport::ok(200, LIST)]);
        let err = client
            .lookup("So11111111111111111111111111111111111111112")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_resolve_to_cached_unknown() {
        let timeout = || -> Result<HttpResponse, TransportError> {
            Err(TransportError::Timeout("operation timed out".to_string()))
        };
        let (client, transport) = make_client(vec![timeout(), timeout(), timeout()]);
        let resolver = TokenMetadataResolver::new(Arc::new(client));

        let mint = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
        assert_eq!(resolver.resolve(mint).await, TokenDetails::unknown());
        assert_eq!(transport.calls(), 3);

        assert_eq!(resolver.resolve(mint).await, TokenDetails::unknown());
        assert_eq!(transport.calls(), 3);
        assert_eq!(resolver.cached_count().await, 1);
    }

    #[test]
    fn test_parse_token_list() {
        let tokens: Vec<JupiterToken> = serde_json::from_str(LIST).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].logo_uri.as_deref(), Some("https://x/usdc.png"));
        assert_eq!(tokens[1].decimals, Some(5));
        assert!(tokens[1].tags.is_empty());
    }
}
