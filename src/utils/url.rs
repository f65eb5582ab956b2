//! Link resolution.

use url::Url;

/// Resolve a scraped `href` against the page it was found on.
///
/// Absolute links are returned verbatim. Relative links are joined onto
/// `base`; without a base (or if the join fails) the raw value is kept.
pub fn resolve_link(base: Option<&Url>, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(joined) => joined.to_string(),
        None => href.to_string(),
    }
}
