/// Error types for the fetching layer and per-address processing
///
/// Lookup failures never leave their resolver (they degrade to `Unknown`), so
/// `FetchError` is mostly seen inside the HTTP client and the API clients.
/// `AddressProcessingError` is the only error the batch runner catches.
use thiserror::Error;

// =============================================================================
// FETCH ERRORS
// =============================================================================

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Non-retryable failure: 4xx other than 429, or a body that failed to decode
    #[error("Request to {url} failed{}: {message}", status_suffix(.status))]
    Request {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// HTTP 429 and the retry policy ran out of attempts
    #[error("Rate limited by {url} after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    /// Transient failure (timeout, connection, 5xx) after exhausting retries
    #[error("Network error for {url} after {attempts} attempts: {message}")]
    Network {
        url: String,
        attempts: u32,
        message: String,
    },

    /// The upstream answered but has no data for the requested key
    #[error("Not found: {0}")]
    NotFound(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

// =============================================================================
// ADDRESS PROCESSING ERRORS
// =============================================================================

/// Failure of a single JSON-RPC call
#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Response { code: i64, message: String },

    #[error("RPC response has neither result nor error")]
    MissingResult,
}

#[derive(Debug, Error)]
pub enum AddressProcessingError {
    #[error("Invalid wallet address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("RPC call {method} failed for {address}: {source}")]
    Rpc {
        address: String,
        method: &'static str,
        #[source]
        source: RpcError,
    },
}

// =============================================================================
// EXPORT ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV for {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display_with_status() {
        let err = FetchError::Request {
            url: "https://example.com".to_string(),
            status: Some(404),
            message: "Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://example.com failed (HTTP 404): Not Found"
        );
    }

    #[test]
    fn test_request_error_display_without_status() {
        let err = FetchError::Request {
            url: "https://example.com".to_string(),
            status: None,
            message: "invalid json".to_string(),
        };
        assert_eq!(err.to_string(), "Request to https://example.com failed: invalid json");
    }

    #[test]
    fn test_rpc_error_keeps_source() {
        let err = AddressProcessingError::Rpc {
            address: "owner".to_string(),
            method: "getBalance",
            source: RpcError::Response {
                code: -32602,
                message: "Invalid param".to_string(),
            },
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
