use crate::retry::{classify_http_status, FetchError};

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u32,
    /// Effective URL after redirects; used to resolve relative links.
    pub url: String,
    pub body: String,
}

impl Response {
    pub fn new(status: u32, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Turn 4xx/5xx (and nonsense) statuses into an error.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        match classify_http_status(self.status) {
            None => Ok(self),
            Some(_) => Err(FetchError::Http(self.status)),
        }
    }
}
