use scraper::{Html, Selector};
use skulk_core::response::PageSnapshot;
use skulk_core::tasks::SelectorProbe;
use tracing::warn;

/// Raw `href` values of every anchor and image-map area in the document,
/// in document order. Resolution against the page URL happens later, at
/// link construction.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href], area[href]").unwrap();
    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// CSS-selector existence checks over a fetched page body.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssProbe;

impl SelectorProbe for CssProbe {
    fn exists(&self, page: &PageSnapshot, selector: &str) -> bool {
        let Ok(parsed) = Selector::parse(selector) else {
            warn!(selector, "unparsable selector");
            return false;
        };
        let document = Html::parse_document(&page.body);
        document.select(&parsed).next().is_some()
    }
}
