/// HTTP client with retry, exponential backoff and 429 handling
use super::backoff::ExponentialBackoff;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::HttpConfig;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Longest body excerpt carried in a `FetchError::Request`
const ERROR_BODY_EXCERPT: usize = 200;

/// How HTTP 429 responses are retried
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLimitRetry {
    /// 429 counts toward `max_attempts`; waits Retry-After or the backoff delay
    Bounded,
    /// 429 is retried forever; waits Retry-After or `fallback_delay`
    Unbounded { fallback_delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts for transient failures (and bounded 429s)
    pub max_attempts: u32,
    pub backoff: ExponentialBackoff,
    pub rate_limit: RateLimitRetry,
}

impl RetryPolicy {
    /// 3 attempts, 1s doubling backoff, bounded 429 retry
    pub fn standard() -> Self {
        Self {
            max_attempts: 3,
            backoff: ExponentialBackoff::default(),
            rate_limit: RateLimitRetry::Bounded,
        }
    }

    /// Historical price lookups: one attempt for transient failures, 429 retried
    /// without bound
    pub fn price_history(fallback_delay: Duration) -> Self {
        Self {
            max_attempts: 1,
            backoff: ExponentialBackoff::default(),
            rate_limit: RateLimitRetry::Unbounded { fallback_delay },
        }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: ExponentialBackoff::with_jitter(
                Duration::from_millis(config.base_delay_ms),
                Duration::from_millis(config.max_delay_ms),
                config.backoff_jitter,
            ),
            rate_limit: RateLimitRetry::Bounded,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outbound HTTP with the retry policy applied to every request
#[derive(Clone)]
pub struct RateLimitedHttpClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl RateLimitedHttpClient {
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Same transport, different policy
    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            policy,
        }
    }

    /// Send `request`, retrying per policy
    ///
    /// Returns the first 2xx response. 4xx other than 429 fails immediately
    /// with `FetchError::Request`.
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut failures: u32 = 0;
        let mut rate_limited: u32 = 0;

        loop {
            logger::debug(
                LogTag::Http,
                &format!(
                    "{:?} {} (failures {}, 429s {})",
                    request.method, request.url, failures, rate_limited
                ),
            );

            let delay = match self.transport.send(request).await {
                Ok(response) if response.is_success() => return Ok(response),

                Ok(response) if response.status == 429 => {
                    rate_limited += 1;
                    let delay = match self.policy.rate_limit {
                        RateLimitRetry::Bounded => {
                            failures += 1;
                            if failures >= max_attempts {
                                return Err(FetchError::RateLimited {
                                    url: request.url.clone(),
                                    attempts: failures,
                                });
                            }
                            response
                                .retry_after
                                .unwrap_or_else(|| self.policy.backoff.delay_for(failures - 1))
                        }
                        RateLimitRetry::Unbounded { fallback_delay } => {
                            response.retry_after.unwrap_or(fallback_delay)
                        }
                    };
                    logger::warning(
                        LogTag::Http,
                        &format!(
                            "Rate limit exceeded for {} (#{}), retrying after {:.1}s",
                            request.url,
                            rate_limited,
                            delay.as_secs_f64()
                        ),
                    );
                    delay
                }

                Ok(response) if response.status >= 500 => {
                    failures += 1;
                    let message = format!("HTTP {}", response.status);
                    if failures >= max_attempts {
                        return Err(FetchError::Network {
                            url: request.url.clone(),
                            attempts: failures,
                            message,
                        });
                    }
                    self.transient_delay(request, failures, &message)
                }

                Ok(response) => {
                    return Err(FetchError::Request {
                        url: request.url.clone(),
                        status: Some(response.status),
                        message: excerpt(&response.body),
                    });
                }

                Err(error) if !error.is_transient() => {
                    return Err(FetchError::Request {
                        url: request.url.clone(),
                        status: None,
                        message: error.to_string(),
                    });
                }

                Err(error) => {
                    failures += 1;
                    if failures >= max_attempts {
                        return Err(FetchError::Network {
                            url: request.url.clone(),
                            attempts: failures,
                            message: error.to_string(),
                        });
                    }
                    self.transient_delay(request, failures, &error.to_string())
                }
            };

            tokio::time::sleep(delay).await;
        }
    }

    /// Send and decode a JSON body; decode failures are not retried
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
    ) -> Result<T, FetchError> {
        let response = self.request(request).await?;
        response.json::<T>().map_err(|e| FetchError::Request {
            url: request.url.clone(),
            status: Some(response.status),
            message: format!("Malformed response: {}", e),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.request_json(&HttpRequest::get(url)).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<T, FetchError> {
        self.request_json(&HttpRequest::post_json(url, body)).await
    }

    fn transient_delay(&self, request: &HttpRequest, failures: u32, reason: &str) -> Duration {
        let delay = self.policy.backoff.delay_for(failures - 1);
        logger::warning(
            LogTag::Http,
            &format!(
                "{} failed ({}), attempt {}/{}; retrying in {:.1}s",
                request.url,
                reason,
                failures,
                self.policy.max_attempts,
                delay.as_secs_f64()
            ),
        );
        delay
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_EXCERPT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_BODY_EXCERPT).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::ScriptedTransport;
    use crate::http::transport::TransportError;
    use tokio::time::Instant;

    fn make_client(
        script: Vec<Result<HttpResponse, TransportError>>,
        policy: RetryPolicy,
    ) -> (RateLimitedHttpClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(script));
        (RateLimitedHttpClient::new(transport.clone(), policy), transport)
    }

    fn rate_limited() -> Result<HttpResponse, TransportError> {
        ScriptedTransport::ok(429, "Too Many Requests")
    }

    fn timeout() -> Result<HttpResponse, TransportError> {
        Err(TransportError::Timeout("operation timed out".to_string()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let (client, transport) = make_client(vec![ScriptedTransport::ok(200, "{}")], RetryPolicy::standard());
        let response = client.request(&HttpRequest::get("https://api")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_429_honors_retry_after() {
        let (client, transport) = make_client(
            vec![
                Ok(HttpResponse::new(429, "").with_retry_after(Duration::from_secs(5))),
                ScriptedTransport::ok(200, "ok"),
            ],
            RetryPolicy::standard(),
        );

        let start = Instant::now();
        let response = client.request(&HttpRequest::get("https://api")).await.unwrap();
        assert_eq!(response.body, "ok");
        assert_eq!(transport.calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_429_gives_up_after_ceiling() {
        let (client, transport) = make_client(
            vec![rate_limited(), rate_limited(), rate_limited(), ScriptedTransport::ok(200, "late")],
            RetryPolicy::standard(),
        );

        let start = Instant::now();
        let err = client.request(&HttpRequest::get("https://api")).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::RateLimited {
                url: "https://api".to_string(),
                attempts: 3
            }
        );
        assert_eq!(transport.calls(), 3);
        // 1s + 2s backoff between the three attempts
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_retry_with_backoff() {
        let (client, transport) = make_client(
            vec![timeout(), ScriptedTransport::ok(503, "busy"), ScriptedTransport::ok(200, "ok")],
            RetryPolicy::standard(),
        );

        let start = Instant::now();
        let response = client.request(&HttpRequest::get("https://api")).await.unwrap();
        assert_eq!(response.body, "ok");
        assert_eq!(transport.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_exhaust_to_network_error() {
        let (client, transport) = make_client(vec![timeout(), timeout(), timeout()], RetryPolicy::standard());

        let err = client.request(&HttpRequest::get("https://api")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { attempts: 3, .. }));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_not_retried() {
        let (client, transport) = make_client(
            vec![ScriptedTransport::ok(404, "coin not found"), ScriptedTransport::ok(200, "ok")],
            RetryPolicy::standard(),
        );

        let err = client.request(&HttpRequest::get("https://api")).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Request {
                url: "https://api".to_string(),
                status: Some(404),
                message: "coin not found".to_string()
            }
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_not_retried() {
        let (client, transport) = make_client(
            vec![Err(TransportError::Invalid("relative URL".to_string()))],
            RetryPolicy::standard(),
        );

        let err = client.request(&HttpRequest::get("api")).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { status: None, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_429_uses_fallback_delay() {
        let mut script: Vec<_> = (0..5).map(|_| rate_limited()).collect();
        script.push(ScriptedTransport::ok(200, "ok"));
        let (client, transport) = make_client(script, RetryPolicy::price_history(Duration::from_secs(62)));

        let start = Instant::now();
        let response = client.request(&HttpRequest::get("https://api")).await.unwrap();
        assert_eq!(response.body, "ok");
        assert_eq!(transport.calls(), 6);
        assert_eq!(start.elapsed(), Duration::from_secs(5 * 62));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_policy_does_not_retry_network_errors() {
        let (client, transport) = make_client(
            vec![timeout(), ScriptedTransport::ok(200, "ok")],
            RetryPolicy::price_history(Duration::from_secs(62)),
        );

        let err = client.request(&HttpRequest::get("https://api")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { attempts: 1, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_resend_identical_request() {
        let (client, transport) = make_client(
            vec![timeout(), rate_limited(), ScriptedTransport::ok(200, "{}")],
            RetryPolicy::standard(),
        );

        let request = HttpRequest::post_json("https://rpc", serde_json::json!({"method": "getBalance"}))
            .with_header("x-test", "1");
        client.request(&request).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|r| *r == request));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_json_is_request_error() {
        let (client, transport) = make_client(
            vec![ScriptedTransport::ok(200, "<html>")],
            RetryPolicy::standard(),
        );

        let err = client
            .get_json::<serde_json::Value>("https://api")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request { status: Some(200), .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_policy_from_config() {
        let config = HttpConfig {
            max_attempts: 0,
            base_delay_ms: 250,
            ..Default::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.backoff.base_delay(), Duration::from_millis(250));
        assert_eq!(policy.rate_limit, RateLimitRetry::Bounded);
    }
}
