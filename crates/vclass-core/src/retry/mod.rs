//! Retry and backoff policy.
//!
//! This module encapsulates failure classification (timeouts, connection
//! failures, HTTP error statuses) and the fixed / exponential delay schedules
//! so that the fetcher and the authenticator share one retry loop.

mod classify;
mod error;
mod policy;
mod run;
mod sleep;

pub use classify::{classify, classify_curl_error, classify_http_status, FailureKind};
pub use error::FetchError;
pub use policy::{RetryDecision, RetryPolicy, Schedule};
pub use run::{run_with_retry, Exhausted};
pub use sleep::{Sleeper, ThreadSleeper};
