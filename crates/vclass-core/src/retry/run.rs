//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};
use super::sleep::Sleeper;

/// All attempts failed; carries the last error.
#[derive(Debug)]
pub struct Exhausted {
    pub attempts: u32,
    pub last_error: FetchError,
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On failure, sleeps for the policy's delay then tries again. There is no
/// sleep after the final attempt.
pub fn run_with_retry<T, F, S>(
    policy: &RetryPolicy,
    sleeper: &mut S,
    mut f: F,
) -> Result<T, Exhausted>
where
    F: FnMut() -> Result<T, FetchError>,
    S: Sleeper + ?Sized,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                tracing::warn!(attempt, ?kind, error = %e, "attempt failed");
                match policy.decide(attempt) {
                    RetryDecision::NoRetry => {
                        return Err(Exhausted {
                            attempts: attempt,
                            last_error: e,
                        })
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::info!(attempt, delay_ms = d.as_millis() as u64, "retrying");
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
