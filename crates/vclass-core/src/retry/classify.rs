//! Classify HTTP status and curl errors into failure kinds.

use super::error::FetchError;

/// High-level classification of a failed attempt.
///
/// Every kind is retried by the portal fetcher; the kind is what ends up in
/// the logs so a flaky network can be told apart from a portal outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, proxy).
    Connection,
    /// HTTP 4xx.
    ClientError(u16),
    /// HTTP 5xx.
    ServerError(u16),
    /// Anything else curl or the server can produce.
    Other,
}

/// Classify an HTTP status code. Returns `None` for statuses that count as success.
pub fn classify_http_status(code: u32) -> Option<FailureKind> {
    match code {
        400..=499 => Some(FailureKind::ClientError(code as u16)),
        500..=599 => Some(FailureKind::ServerError(code as u16)),
        0..=99 | 600.. => Some(FailureKind::Other),
        _ => None,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return FailureKind::Connection;
    }
    FailureKind::Other
}

/// Classify a fetch error (curl or HTTP) into a FailureKind.
pub fn classify(e: &FetchError) -> FailureKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code).unwrap_or(FailureKind::Other),
    }
}
