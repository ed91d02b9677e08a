//! Form login.
//!
//! `Unauthenticated -> [GET login page] -> TokenObtained | Failed -> [POST credentials] -> Authenticated | Failed`
//!
//! When the login page cannot be fetched the caller's [`FallbackSelector`]
//! picks an alternative fetch strategy; the authenticator itself never talks
//! to the console.

use scraper::Html;

use crate::config::Credentials;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::http::{HttpClient, Response};
use crate::retry::{FetchError, Sleeper};
use crate::scrape::selector;

/// Present in the login response body when the portal rejected the credentials.
pub const LOGIN_ERROR_MARKER: &str = "loginerrors";

/// Hidden anti-forgery field on the login form.
pub const LOGIN_TOKEN_SELECTOR: &str = r#"input[name="logintoken"]"#;

/// Alternative strategy for reaching a page after the default retries failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Fixed-delay retry again.
    Retry,
    /// Exponential backoff.
    Backoff,
    /// One request through the given proxy URL.
    Proxy(String),
}

/// Chooses a fallback strategy once the default fetch is exhausted.
/// Returning `None` gives up.
pub trait FallbackSelector {
    fn choose(&mut self, url: &str, failure: &FetchOutcome) -> Option<Fallback>;
}

/// Never offers a fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackSelector for NoFallback {
    fn choose(&mut self, _url: &str, _failure: &FetchOutcome) -> Option<Fallback> {
        None
    }
}

/// Final state of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated,
    /// Portal answered with the login error marker.
    Rejected,
    /// Login page unreachable, including after any fallback.
    LoginPageUnavailable,
    /// The credential POST itself failed (network error or HTTP error status). Not retried.
    SubmitFailed(FetchError),
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated)
    }
}

/// Value of the hidden login token, or an empty string when the form has none.
pub fn login_token(html: &str) -> String {
    let Some(sel) = selector(LOGIN_TOKEN_SELECTOR) else {
        return String::new();
    };
    Html::parse_document(html)
        .select(&sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .unwrap_or_default()
        .to_string()
}

/// True when the response body carries the login error marker.
pub fn login_rejected(body: &str) -> bool {
    body.contains(LOGIN_ERROR_MARKER)
}

/// Fetch `url` with the strategy the user picked.
pub fn fetch_with_fallback<C, S>(
    fetcher: &mut Fetcher<S>,
    client: &mut C,
    url: &str,
    fallback: &Fallback,
) -> FetchOutcome
where
    C: HttpClient + ?Sized,
    S: Sleeper,
{
    match fallback {
        Fallback::Retry => fetcher.fetch_with_retry(client, url),
        Fallback::Backoff => fetcher.fetch_with_backoff(client, url),
        Fallback::Proxy(proxy) => fetcher.fetch_via_proxy(client, url, proxy),
    }
}

/// Log in on `client`'s session.
pub fn login<C, S>(
    fetcher: &mut Fetcher<S>,
    client: &mut C,
    login_url: &str,
    creds: &Credentials,
    fallbacks: &mut dyn FallbackSelector,
) -> LoginOutcome
where
    C: HttpClient + ?Sized,
    S: Sleeper,
{
    let Some(page) = fetch_login_page(fetcher, client, login_url, fallbacks) else {
        return LoginOutcome::LoginPageUnavailable;
    };

    let token = login_token(&page.body);
    if token.is_empty() {
        tracing::warn!("login form has no token, submitting without one");
    } else {
        tracing::debug!(token = token.as_str(), "found login token");
    }

    submit_credentials(client, login_url, creds, &token)
}

fn fetch_login_page<C, S>(
    fetcher: &mut Fetcher<S>,
    client: &mut C,
    login_url: &str,
    fallbacks: &mut dyn FallbackSelector,
) -> Option<Response>
where
    C: HttpClient + ?Sized,
    S: Sleeper,
{
    let first = fetcher.fetch_with_retry(client, login_url);
    if first.is_fetched() {
        return first.into_response();
    }

    tracing::warn!(login_url, "login page unreachable, asking for a fallback");
    let fallback = fallbacks.choose(login_url, &first)?;
    tracing::info!(?fallback, "trying fallback");
    fetch_with_fallback(fetcher, client, login_url, &fallback).into_response()
}

fn submit_credentials<C>(
    client: &mut C,
    login_url: &str,
    creds: &Credentials,
    token: &str,
) -> LoginOutcome
where
    C: HttpClient + ?Sized,
{
    let fields = [
        ("username", creds.username.as_str()),
        ("password", creds.password.as_str()),
        ("logintoken", token),
    ];
    let resp = match client
        .post_form(login_url, &fields)
        .and_then(Response::error_for_status)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "login POST failed");
            return LoginOutcome::SubmitFailed(e);
        }
    };

    if login_rejected(&resp.body) {
        tracing::warn!(username = creds.username.as_str(), "portal rejected credentials");
        LoginOutcome::Rejected
    } else {
        tracing::info!(username = creds.username.as_str(), landed = resp.url.as_str(), "logged in");
        LoginOutcome::Authenticated
    }
}
