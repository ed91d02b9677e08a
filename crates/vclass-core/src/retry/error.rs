//! Single-request error type for retry classification.

use thiserror::Error;

/// Error returned by one HTTP attempt (curl failure or HTTP error status).
/// Used so we can classify and decide retries before reporting to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, proxy, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response arrived with a status the caller treats as failure.
    #[error("HTTP {0}")]
    Http(u32),
}
