//! Ordered, de-duplicated product URL list.

use std::collections::HashSet;

/// Column header used when the table is persisted.
pub const URL_COLUMN: &str = "Product URL";

/// Product URLs in discovery order.
///
/// Insertion through [`UrlTable::insert`] never stores the same URL twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTable {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl UrlTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a URL if it is not already present. Returns true if added.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.urls.push(url);
        true
    }

    /// Append every URL from an iterator, returning how many were new.
    pub fn extend_new<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            if self.insert(url) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for UrlTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for url in iter {
            table.insert(url);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicates_and_keeps_order() {
        let mut table = UrlTable::new();
        assert!(table.insert("/p/a"));
        assert!(table.insert("/p/b"));
        assert!(!table.insert("/p/a"));
        assert!(table.insert("/p/c"));
        assert_eq!(table.urls(), &["/p/a", "/p/b", "/p/c"]);
    }

    #[test]
    fn test_extend_new_counts_only_new() {
        let mut table: UrlTable = ["/p/a", "/p/b"].into_iter().collect();
        let added = table.extend_new(["/p/b", "/p/c", "/p/c", "/p/d"]);
        assert_eq!(added, 2);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_collect_drops_repeats() {
        let table: UrlTable = ["/p/a", "/p/b", "/p/a"].into_iter().collect();
        assert_eq!(table.iter().collect::<Vec<_>>(), ["/p/a", "/p/b"]);
        assert!(!table.is_empty());
    }
}
