use scraper::Html;

use super::text::{element_text, selector};

/// Course summary block on a course page.
pub const DESCRIPTION_SELECTOR: &str = "div#intro";

/// Text of the course description, or `None` when the page has no intro block.
pub fn parse_description(html: &str) -> Option<String> {
    let sel = selector(DESCRIPTION_SELECTOR)?;
    let doc = Html::parse_document(html);
    let intro = doc.select(&sel).next()?;
    Some(element_text(&intro))
}
