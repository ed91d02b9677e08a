//! Page scrapers: turn one fetched page into plain records.
//!
//! Parsing is pure (`&str` in, records out); fetching and the courtesy pause
//! live in [`crate::portal`].

mod courses;
mod detail;
mod text;
mod timeline;

pub(crate) use text::selector;

pub use courses::{filter_courses, matches_filter, parse_courses, Course, COURSE_LINK_SELECTOR};
pub use detail::{parse_description, DESCRIPTION_SELECTOR};
pub use timeline::{
    parse_timeline, Activity, ACTIVITY_SELECTOR, COURSE_NAME_SELECTOR, DUE_DATE_SELECTOR,
};

use thiserror::Error;

use crate::retry::FetchError;

/// A scraper could not obtain its page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not fetch {url} after {attempts} attempt(s): {source}")]
    Unavailable {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },
}
