//! Shared DOM helpers.

use scraper::{ElementRef, Selector};
use url::Url;

/// Compile a constant selector. A bad selector is a programming error, but
/// scrapers degrade to "nothing found" instead of aborting the menu.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::error!(css, error = ?e, "invalid selector");
            None
        }
    }
}

/// Visible text of an element: each text node trimmed, then concatenated
/// with no separator. `<a>Algoritma<span>Budi</span></a>` reads "AlgoritmaBudi".
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Resolve `href` against the page it was found on; keep it verbatim if either is unparsable.
pub(crate) fn resolve_link(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
