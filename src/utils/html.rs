//! Text helpers over parsed HTML.

use scraper::{ElementRef, Html, Selector};

/// Visible text of an element: each text node trimmed, empty nodes dropped,
/// the rest concatenated without separators.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Text of the first element matching `selector`, if any.
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(|el| element_text(&el))
}

/// Attribute value of the first element matching `selector`.
///
/// Returns `None` when nothing matches or the first match lacks the attribute.
pub fn first_attr(document: &Html, selector: &Selector, attribute: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attribute))
        .map(|v| v.to_string())
}
