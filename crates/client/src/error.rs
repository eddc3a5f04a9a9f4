//! Typed error type for the client crate.

use thiserror::Error;

/// Errors raised while building a dispatcher. Request-time failures are
/// reported as `commands::DispatchError` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}
