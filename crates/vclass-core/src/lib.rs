pub mod config;
pub mod logging;

pub mod auth;
pub mod fetch;
pub mod http;
pub mod portal;
pub mod retry;
pub mod scrape;
