//! Portal operations on an explicit session.
//!
//! `Portal` owns the endpoints, both retry policies and the courtesy delay;
//! the session is always passed in by the caller.

use std::time::Duration;

use anyhow::Result;

use crate::auth::{self, FallbackSelector, LoginOutcome};
use crate::config::{Credentials, Endpoints, VclassConfig};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::http::{HttpClient, Response};
use crate::retry::{Sleeper, ThreadSleeper};
use crate::scrape::{
    filter_courses, parse_courses, parse_description, parse_timeline, Activity, Course,
    ScrapeError,
};

pub struct Portal<S = ThreadSleeper> {
    endpoints: Endpoints,
    fetcher: Fetcher<S>,
    courtesy_delay: Duration,
}

impl Portal<ThreadSleeper> {
    pub fn from_config(cfg: &VclassConfig) -> Result<Self> {
        Ok(Self::new(
            cfg.endpoints()?,
            Fetcher::new(cfg.retry_policy(), cfg.backoff_policy()),
            cfg.courtesy_delay(),
        ))
    }
}

impl<S: Sleeper> Portal<S> {
    pub fn new(endpoints: Endpoints, fetcher: Fetcher<S>, courtesy_delay: Duration) -> Self {
        Self {
            endpoints,
            fetcher,
            courtesy_delay,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    pub fn login<C>(
        &mut self,
        client: &mut C,
        creds: &Credentials,
        fallbacks: &mut dyn FallbackSelector,
    ) -> LoginOutcome
    where
        C: HttpClient + ?Sized,
    {
        auth::login(
            &mut self.fetcher,
            client,
            &self.endpoints.login,
            creds,
            fallbacks,
        )
    }

    /// Enrolled courses from the dashboard, optionally filtered on title text.
    pub fn courses<C>(
        &mut self,
        client: &mut C,
        filter: Option<&str>,
    ) -> Result<Vec<Course>, ScrapeError>
    where
        C: HttpClient + ?Sized,
    {
        let url = self.endpoints.dashboard.clone();
        let page = self.fetch_page(client, &url)?;
        let courses = filter_courses(parse_courses(&page.body, &page.url), filter);
        tracing::info!(count = courses.len(), ?filter, "courses scraped");
        Ok(courses)
    }

    /// Description block of one course page; `Ok(None)` when the page has none.
    pub fn course_detail<C>(
        &mut self,
        client: &mut C,
        link: &str,
    ) -> Result<Option<String>, ScrapeError>
    where
        C: HttpClient + ?Sized,
    {
        let page = self.fetch_page(client, link)?;
        let description = parse_description(&page.body);
        if description.is_none() {
            tracing::info!(link, "course page has no description");
        }
        Ok(description)
    }

    /// Activities listed on the timeline page. Empty means nothing is due.
    pub fn timeline<C>(&mut self, client: &mut C) -> Result<Vec<Activity>, ScrapeError>
    where
        C: HttpClient + ?Sized,
    {
        let url = self.endpoints.timeline.clone();
        let page = self.fetch_page(client, &url)?;
        let activities = parse_timeline(&page.body, &page.url);
        tracing::info!(count = activities.len(), "timeline scraped");
        Ok(activities)
    }

    /// Fixed-retry GET followed by the courtesy pause.
    fn fetch_page<C>(&mut self, client: &mut C, url: &str) -> Result<Response, ScrapeError>
    where
        C: HttpClient + ?Sized,
    {
        match self.fetcher.fetch_with_retry(client, url) {
            FetchOutcome::Fetched(page) => {
                self.fetcher.pause(self.courtesy_delay);
                Ok(page)
            }
            FetchOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(ScrapeError::Unavailable {
                url: url.to_string(),
                attempts,
                source: last_error,
            }),
            FetchOutcome::Failed(e) => Err(ScrapeError::Unavailable {
                url: url.to_string(),
                attempts: 1,
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{fetcher, RecordingSleeper, ScriptedClient};

    const DASH: &str = "https://portal.test/my/";

    fn portal() -> Portal<RecordingSleeper> {
        let endpoints = Endpoints {
            login: "https://portal.test/login/index.php".to_string(),
            dashboard: DASH.to_string(),
            timeline: DASH.to_string(),
        };
        Portal::new(endpoints, fetcher(), Duration::from_secs(1))
    }

    const DASHBOARD: &str = r#"<ul class="unlist">
        <li><div class="column"><a href="/course/view.php?id=1">Algoritma - Budi</a></div></li>
        <li><div class="column"><a href="/course/view.php?id=2">Basis Data - Siti</a></div></li>
    </ul>"#;

    #[test]
    fn courses_filtered_and_paused() {
        let mut client = ScriptedClient::default();
        client.push_page(200, DASH, DASHBOARD);
        let mut p = portal();
        let courses = p.courses(&mut client, Some("budi")).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Algoritma - Budi");
        assert_eq!(courses[0].link, "https://portal.test/course/view.php?id=1");
        assert_eq!(p.fetcher().sleeper().0, vec![Duration::from_secs(1)]);
    }

    #[test]
    fn unreachable_dashboard_is_unavailable_without_pause() {
        let mut client = ScriptedClient::default();
        let mut p = portal();
        let err = p.courses(&mut client, None).unwrap_err();
        let ScrapeError::Unavailable { url, attempts, .. } = err;
        assert_eq!(url, DASH);
        assert_eq!(attempts, 3);
        // Only the two retry waits, no courtesy pause.
        assert_eq!(p.fetcher().sleeper().0, vec![Duration::from_secs(5); 2]);
    }

    #[test]
    fn course_detail_found_and_missing() {
        let mut client = ScriptedClient::default();
        let link = "https://portal.test/course/view.php?id=1";
        client
            .push_page(200, link, r#"<div id="intro">Pengantar algoritma.</div>"#)
            .push_page(200, link, "<div>no intro</div>");
        let mut p = portal();
        assert_eq!(
            p.course_detail(&mut client, link).unwrap().as_deref(),
            Some("Pengantar algoritma.")
        );
        assert_eq!(p.course_detail(&mut client, link).unwrap(), None);
        assert_eq!(client.requests, vec![format!("GET {}", link); 2]);
    }

    #[test]
    fn empty_timeline() {
        let mut client = ScriptedClient::default();
        client.push_page(200, DASH, "<div class=\"block_timeline\"></div>");
        let mut p = portal();
        assert!(p.timeline(&mut client).unwrap().is_empty());
    }

    #[test]
    fn timeline_returns_activities() {
        let mut client = ScriptedClient::default();
        client.push_page(
            200,
            DASH,
            r#"<div class="course_name">Algoritma</div>
               <div class="activityinstance"><a href="/mod/assign/view.php?id=3">Tugas 2</a></div>
               <span class="due_date">Kamis</span>"#,
        );
        let mut p = portal();
        let acts = p.timeline(&mut client).unwrap();
        assert_eq!(acts.len(), 1);
        assert_eq!(acts[0].course_name, "Algoritma");
        assert_eq!(acts[0].deadline.as_deref(), Some("Kamis"));
    }
}
