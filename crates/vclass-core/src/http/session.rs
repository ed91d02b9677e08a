use std::time::Duration;

use curl::easy::Easy;

use super::{encode_form, HttpClient, Response};
use crate::config::VclassConfig;
use crate::retry::FetchError;

/// Transport settings applied to the curl handle.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl From<&VclassConfig> for SessionOptions {
    fn from(cfg: &VclassConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Cookie-bearing portal session backed by one curl easy handle.
pub struct Session {
    easy: Easy,
    opts: SessionOptions,
}

impl Session {
    pub fn new(opts: SessionOptions) -> Result<Self, FetchError> {
        let mut session = Self {
            easy: Easy::new(),
            opts,
        };
        session.configure()?;
        Ok(session)
    }

    fn configure(&mut self) -> Result<(), curl::Error> {
        // Empty cookie file enables the in-memory cookie engine.
        self.easy.cookie_file("")?;
        self.easy.follow_location(true)?;
        self.easy.max_redirections(10)?;
        self.easy.connect_timeout(self.opts.connect_timeout)?;
        self.easy.timeout(self.opts.timeout)?;
        self.easy.accept_encoding("")?;
        if let Some(ua) = &self.opts.user_agent {
            self.easy.useragent(ua)?;
        }
        Ok(())
    }

    /// Run the transfer configured on the handle and collect the body.
    fn perform(&mut self, url: &str) -> Result<Response, FetchError> {
        let mut body = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = self.easy.response_code()?;
        let effective = self
            .easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        tracing::debug!(url, status, bytes = body.len(), "response");
        Ok(Response {
            status,
            url: effective,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl HttpClient for Session {
    fn get(&mut self, url: &str) -> Result<Response, FetchError> {
        self.easy.url(url)?;
        self.easy.get(true)?;
        self.perform(url)
    }

    fn post_form(&mut self, url: &str, fields: &[(&str, &str)]) -> Result<Response, FetchError> {
        let body = encode_form(fields);
        self.easy.url(url)?;
        self.easy.post(true)?;
        self.easy.post_fields_copy(body.as_bytes())?;
        self.perform(url)
    }

    fn get_via_proxy(&mut self, url: &str, proxy: &str) -> Result<Response, FetchError> {
        self.easy.proxy(proxy)?;
        let result = self.get(url);
        // reset() keeps the cookie store; it only drops options, so reapply ours.
        self.easy.reset();
        self.configure()?;
        result
    }
}
