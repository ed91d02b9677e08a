use scraper::Html;

use super::text::{element_text, resolve_link, selector};

/// Course anchors on the dashboard ("my") page.
pub const COURSE_LINK_SELECTOR: &str = "ul.unlist li div.column a";

/// One enrolled course as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub title: String,
    pub link: String,
}

/// Extract every course anchor from the dashboard, in page order.
/// Anchors without `href` are skipped.
pub fn parse_courses(html: &str, page_url: &str) -> Vec<Course> {
    let Some(sel) = selector(COURSE_LINK_SELECTOR) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&sel)
        .filter_map(|a| {
            let title = element_text(&a);
            match a.value().attr("href") {
                Some(href) => Some(Course {
                    title,
                    link: resolve_link(page_url, href),
                }),
                None => {
                    tracing::debug!(title = title.as_str(), "course anchor without href");
                    None
                }
            }
        })
        .collect()
}

/// Case-insensitive substring match on the course title.
///
/// The menu offers this as "filter by lecturer", but the dashboard has no
/// lecturer field: only lecturer names that appear in the title text match.
/// Titles are the anchor's text nodes concatenated without separators, so
/// `<a>Algoritma<span>Budi</span></a>` matches "mabu" but not "algoritma budi".
pub fn matches_filter(title: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(f) => title.to_lowercase().contains(&f.to_lowercase()),
    }
}

pub fn filter_courses(courses: Vec<Course>, filter: Option<&str>) -> Vec<Course> {
    courses
        .into_iter()
        .filter(|c| matches_filter(&c.title, filter))
        .collect()
}
