//! Outbound HTTP with retry and rate-limit handling
//!
//! - `transport` - the `HttpTransport` seam and its reqwest implementation
//! - `backoff` - exponential backoff delays
//! - `client` - `RateLimitedHttpClient`, which applies a `RetryPolicy`

pub mod backoff;
pub mod client;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use backoff::ExponentialBackoff;
pub use client::{RateLimitRetry, RateLimitedHttpClient, RetryPolicy};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
