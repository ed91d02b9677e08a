//! Recent activities from the timeline block.
//!
//! The timeline markup carries no explicit link between an activity and its
//! course or due date. Association is by document order: the nearest
//! `div.course_name` before the activity and the nearest `span.due_date`
//! after it. This is best effort and can pair the wrong nodes when the page
//! layout is irregular.

use scraper::{ElementRef, Html};

use super::text::{element_text, resolve_link, selector};

pub const ACTIVITY_SELECTOR: &str = "div.activityinstance a";
pub const DUE_DATE_SELECTOR: &str = "span.due_date";
pub const COURSE_NAME_SELECTOR: &str = "div.course_name";

/// One activity item from the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub title: String,
    pub link: String,
    /// Empty when no course name precedes the activity.
    pub course_name: String,
    pub deadline: Option<String>,
}

enum Mark<'a> {
    Activity(ElementRef<'a>),
    Due(String),
    Course(String),
}

/// Extract activities in page order. Empty when the page has no activity anchors.
pub fn parse_timeline(html: &str, page_url: &str) -> Vec<Activity> {
    let (Some(activity_sel), Some(due_sel), Some(course_sel)) = (
        selector(ACTIVITY_SELECTOR),
        selector(DUE_DATE_SELECTOR),
        selector(COURSE_NAME_SELECTOR),
    ) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);

    // Pre-order traversal is document order.
    let marks: Vec<Mark<'_>> = doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|el| {
            if activity_sel.matches(&el) {
                Some(Mark::Activity(el))
            } else if due_sel.matches(&el) {
                Some(Mark::Due(element_text(&el)))
            } else if course_sel.matches(&el) {
                Some(Mark::Course(element_text(&el)))
            } else {
                None
            }
        })
        .collect();

    let mut due_after: Vec<Option<String>> = vec![None; marks.len()];
    let mut next_due = None;
    for (i, mark) in marks.iter().enumerate().rev() {
        due_after[i] = next_due.clone();
        if let Mark::Due(d) = mark {
            next_due = Some(d.clone());
        }
    }

    let mut activities = Vec::new();
    let mut last_course = String::new();
    for (mark, deadline) in marks.iter().zip(due_after) {
        match mark {
            Mark::Course(name) => last_course = name.clone(),
            Mark::Due(_) => {}
            Mark::Activity(a) => {
                let title = element_text(a);
                let Some(href) = a.value().attr("href") else {
                    tracing::debug!(title = title.as_str(), "activity anchor without href");
                    continue;
                };
                activities.push(Activity {
                    title,
                    link: resolve_link(page_url, href),
                    course_name: last_course.clone(),
                    deadline,
                });
            }
        }
    }
    activities
}
