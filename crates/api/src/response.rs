//! Shared response envelope for paginated list endpoints.
//!
//! Every list endpoint answers with `{count, next, previous, results}`;
//! `next`/`previous` are relative links carrying the limit/offset pair, or
//! null at either end of the collection.

use serde::Serialize;

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    /// Total number of results matching the query, across all pages.
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Build a page for `path` given the already-clamped limit/offset.
    pub fn new(path: &str, count: i64, limit: i64, offset: i64, results: Vec<T>) -> Self {
        let next = (offset + limit < count)
            .then(|| format!("{path}?limit={limit}&offset={}", offset + limit));
        let previous = (offset > 0).then(|| {
            let prev = (offset - limit).max(0);
            format!("{path}?limit={limit}&offset={prev}")
        });
        Page {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_previous() {
        let page = Page::new("/api/v1/titles", 50, 20, 0, vec![1, 2, 3]);
        assert!(page.previous.is_none());
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/titles?limit=20&offset=20")
        );
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page = Page::new("/api/v1/titles", 50, 20, 20, vec![1]);
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/titles?limit=20&offset=0")
        );
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/titles?limit=20&offset=40")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let page = Page::new("/api/v1/titles", 50, 20, 40, vec![1]);
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/titles?limit=20&offset=20")
        );
    }

    #[test]
    fn short_offset_clamps_previous_to_zero() {
        let page = Page::new("/x", 30, 20, 10, vec![1]);
        assert_eq!(page.previous.as_deref(), Some("/x?limit=20&offset=0"));
    }

    #[test]
    fn empty_collection_has_no_links() {
        let page: Page<i32> = Page::new("/x", 0, 20, 0, vec![]);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
        assert_eq!(page.count, 0);
    }
}
