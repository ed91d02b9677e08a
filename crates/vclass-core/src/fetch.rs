//! Policy-driven page fetching on the shared session.
//!
//! The fetcher never prompts and never panics: every call ends in a
//! [`FetchOutcome`] and the caller decides whether to offer alternatives.

use std::time::Duration;

use crate::http::{HttpClient, Response};
use crate::retry::{run_with_retry, Exhausted, FetchError, RetryPolicy, Sleeper, ThreadSleeper};

/// Result of fetching one page.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Response),
    /// A single, non-retried attempt failed (proxy path).
    Failed(FetchError),
    /// Every attempt allowed by the policy failed.
    Exhausted { attempts: u32, last_error: FetchError },
}

impl FetchOutcome {
    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Fetched(r) => Some(r),
            FetchOutcome::Failed(_) | FetchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }
}

impl From<Result<Response, Exhausted>> for FetchOutcome {
    fn from(r: Result<Response, Exhausted>) -> Self {
        match r {
            Ok(resp) => FetchOutcome::Fetched(resp),
            Err(Exhausted {
                attempts,
                last_error,
            }) => FetchOutcome::Exhausted {
                attempts,
                last_error,
            },
        }
    }
}

/// Holds both retry policies and the sleeper used for waits.
#[derive(Debug, Clone)]
pub struct Fetcher<S = ThreadSleeper> {
    pub retry: RetryPolicy,
    pub backoff: RetryPolicy,
    sleeper: S,
}

impl Default for Fetcher<ThreadSleeper> {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), RetryPolicy::default_backoff())
    }
}

impl Fetcher<ThreadSleeper> {
    pub fn new(retry: RetryPolicy, backoff: RetryPolicy) -> Self {
        Self::with_sleeper(retry, backoff, ThreadSleeper)
    }
}

impl<S: Sleeper> Fetcher<S> {
    pub fn with_sleeper(retry: RetryPolicy, backoff: RetryPolicy, sleeper: S) -> Self {
        Self {
            retry,
            backoff,
            sleeper,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// GET with the fixed-delay policy.
    pub fn fetch_with_retry<C>(&mut self, client: &mut C, url: &str) -> FetchOutcome
    where
        C: HttpClient + ?Sized,
    {
        let policy = self.retry;
        self.fetch_with_policy(client, url, &policy)
    }

    /// GET with the exponential backoff policy.
    pub fn fetch_with_backoff<C>(&mut self, client: &mut C, url: &str) -> FetchOutcome
    where
        C: HttpClient + ?Sized,
    {
        let policy = self.backoff;
        self.fetch_with_policy(client, url, &policy)
    }

    /// GET under an arbitrary policy. A response with status 4xx/5xx counts as a failed attempt.
    pub fn fetch_with_policy<C>(
        &mut self,
        client: &mut C,
        url: &str,
        policy: &RetryPolicy,
    ) -> FetchOutcome
    where
        C: HttpClient + ?Sized,
    {
        tracing::debug!(url, max_attempts = policy.max_attempts, "fetch");
        let outcome: FetchOutcome = run_with_retry(policy, &mut self.sleeper, || {
            client.get(url).and_then(Response::error_for_status)
        })
        .into();
        if let FetchOutcome::Exhausted { attempts, .. } = &outcome {
            tracing::warn!(url, attempts, "giving up");
        }
        outcome
    }

    /// One GET through `proxy`, no retries. Only HTTP 200 counts as success.
    pub fn fetch_via_proxy<C>(&mut self, client: &mut C, url: &str, proxy: &str) -> FetchOutcome
    where
        C: HttpClient + ?Sized,
    {
        tracing::info!(url, proxy, "fetch via proxy");
        match client.get_via_proxy(url, proxy) {
            Ok(resp) if resp.is_ok() => FetchOutcome::Fetched(resp),
            Ok(resp) => {
                tracing::warn!(url, status = resp.status, "proxy fetch rejected");
                FetchOutcome::Failed(FetchError::Http(resp.status))
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "proxy fetch failed");
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Courtesy pause between page fetches.
    pub fn pause(&mut self, duration: Duration) {
        self.sleeper.sleep(duration);
    }
}
