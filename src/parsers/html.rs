use crate::parsers::ExtractedTags;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("link").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

/// Parses an HTML document and extracts the robots directive, canonical
/// link, title and every h1 heading
pub fn extract_tags(html: &str) -> ExtractedTags {
    let doc = Html::parse_document(html);

    let robots = doc
        .select(&META_SELECTOR)
        .find(|e| attr_equals(e, "name", "robots"))
        .and_then(|e| e.value().attr("content"))
        .map(|s| s.to_string());

    let canonical = doc
        .select(&LINK_SELECTOR)
        .find(|e| attr_equals(e, "rel", "canonical"))
        .and_then(|e| e.value().attr("href"))
        .map(|s| s.to_string());

    let title = doc
        .select(&TITLE_SELECTOR)
        .next()
        .map(|e| element_text(&e));

    let h1 = doc
        .select(&H1_SELECTOR)
        .map(|e| element_text(&e))
        .collect::<Vec<String>>();

    ::log::trace!(
        "Extracted robots={:?} canonical={:?} with {} h1 headings",
        robots,
        canonical,
        h1.len()
    );

    ExtractedTags {
        robots,
        canonical,
        title,
        h1,
    }
}

/// Attribute names are already lower-cased by the HTML parser; values are
/// compared ignoring ASCII case
fn attr_equals(element: &ElementRef, name: &str, expected: &str) -> bool {
    element
        .value()
        .attr(name)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
