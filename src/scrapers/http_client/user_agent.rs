//! User-Agent values sent with product page requests.
//!
//! Extraction uses [`DEFAULT_USER_AGENT`] unless the config or
//! `CATALOGSCRAPE_USER_AGENT` names another. The value `impersonate` picks
//! one of a few current desktop browser strings per run.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Desktop Chrome string the product pages were first scraped with.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36";

/// Keyword that selects a rotating browser string.
pub const IMPERSONATE: &str = "impersonate";

const BROWSER_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
];

/// Turn a configured value into the header to send.
///
/// [`IMPERSONATE`] (any case, surrounding whitespace ignored) yields one of
/// the built-in browser strings. Anything else is sent as written.
pub fn resolve_user_agent(value: &str) -> String {
    if value.trim().eq_ignore_ascii_case(IMPERSONATE) {
        let seed = RandomState::new().build_hasher().finish();
        BROWSER_USER_AGENTS[(seed % BROWSER_USER_AGENTS.len() as u64) as usize].to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_value_sent_verbatim() {
        assert_eq!(resolve_user_agent("CatalogBot/0.3"), "CatalogBot/0.3");
        assert_eq!(resolve_user_agent(DEFAULT_USER_AGENT), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_impersonate_picks_browser_string() {
        for value in ["impersonate", " Impersonate "] {
            let ua = resolve_user_agent(value);
            assert!(BROWSER_USER_AGENTS.contains(&ua.as_str()), "{ua}");
        }
    }
}
