//! HTTP session wrapper.
//!
//! A single long-lived curl handle with its cookie engine enabled carries the
//! portal login across requests. Callers hold it by `&mut` and pass it into
//! every fetch; nothing else owns it.

mod response;
mod session;

pub use response::Response;
pub use session::{Session, SessionOptions};

use crate::retry::FetchError;

/// One request on the shared session. Implementations return whatever status
/// the server sent; interpreting the status is the fetcher's job.
pub trait HttpClient {
    /// GET `url`, following redirects.
    fn get(&mut self, url: &str) -> Result<Response, FetchError>;

    /// POST `fields` as `application/x-www-form-urlencoded` to `url`.
    fn post_form(&mut self, url: &str, fields: &[(&str, &str)]) -> Result<Response, FetchError>;

    /// GET `url` once through `proxy` (e.g. `http://proxyserver:3128`).
    fn get_via_proxy(&mut self, url: &str, proxy: &str) -> Result<Response, FetchError>;
}

/// Encode form fields the way browsers submit them.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}
