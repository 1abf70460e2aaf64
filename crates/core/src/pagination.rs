//! Page-number pagination.
//!
//! Listings are paged with `page` (1-based) and `pageSize` query parameters.
//! This module owns the arithmetic (offsets, page counts) and the small
//! window of numbered links rendered under result grids and admin tables.

use serde::Serialize;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of numbered links shown at once.
pub const PAGE_WINDOW: u32 = 5;

/// A requested page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` to at least 1 and `page_size` into
    /// `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Parse a `page` query value. Missing, non-numeric, or zero values mean
    /// the first page.
    #[must_use]
    pub fn from_query(page: Option<&str>, page_size: u32) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(page, page_size)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Rows to fetch.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// Number of pages needed for `total` items.
#[must_use]
pub fn total_pages(total: i64, page_size: u32) -> u32 {
    if total <= 0 || page_size == 0 {
        return 0;
    }
    let pages = total.div_euclid(i64::from(page_size))
        + i64::from(total.rem_euclid(i64::from(page_size)) != 0);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of results plus the counts needed to render pagination.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    /// Assemble a page from fetched rows and the unpaged total.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total,
            total_pages: total_pages(total, request.page_size()),
        }
    }

    /// Transform the items, keeping the counts.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Page numbers to show as links around `current`.
///
/// At most [`PAGE_WINDOW`] numbers, centred on `current` where possible and
/// shifted left near the last page. Empty when there is at most one page.
#[must_use]
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let mut start = current.saturating_sub(2).max(1);
    let end = total_pages.min(start + PAGE_WINDOW - 1);
    if end == total_pages {
        start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    }

    (start..=end).collect()
}

/// A numbered pagination link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub is_current: bool,
}

/// Everything a template needs to render pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub prev_url: String,
    pub prev_disabled: bool,
    pub next_url: String,
    pub next_disabled: bool,
    pub pages: Vec<PageLink>,
}

impl PageLinks {
    /// Build the links for `current` of `total_pages`, using `url_for` to turn
    /// a page number into an href.
    ///
    /// Returns `None` when there is nothing to paginate. A `current` past the
    /// last page is treated as the last page.
    pub fn build(
        current: u32,
        total_pages: u32,
        url_for: impl Fn(u32) -> String,
    ) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let current = current.clamp(1, total_pages);
        let pages = page_window(current, total_pages)
            .into_iter()
            .map(|number| PageLink {
                number,
                url: url_for(number),
                is_current: number == current,
            })
            .collect();

        Some(Self {
            prev_url: url_for(current.saturating_sub(1).max(1)),
            prev_disabled: current <= 1,
            next_url: url_for(current.saturating_add(1).min(total_pages)),
            next_disabled: current >= total_pages,
            pages,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_links_past_last_page() {
        let links = PageLinks::build(50, 3, |n| format!("?page={n}")).unwrap();
        assert_eq!(links.prev_url, "?page=2");
        assert!(!links.prev_disabled);
        assert_eq!(links.next_url, "?page=3");
        assert!(links.next_disabled);

        let current: Vec<u32> = links
            .pages
            .iter()
            .filter(|p| p.is_current)
            .map(|p| p.number)
            .collect();
        assert_eq!(current, vec![3]);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), 1);

        let req = PageRequest::new(3, 1000);
        assert_eq!(req.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_request_from_query() {
        assert_eq!(PageRequest::from_query(None, 10).page(), 1);
        assert_eq!(PageRequest::from_query(Some("abc"), 10).page(), 1);
        assert_eq!(PageRequest::from_query(Some("0"), 10).page(), 1);
        assert_eq!(PageRequest::from_query(Some(" 4 "), 10).page(), 4);
    }

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest::new(3, 10);
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 9), 11);
    }

    #[test]
    fn test_paginated_counts_consistent() {
        let page = Paginated::new(vec![1, 2, 3], PageRequest::new(2, 3), 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);

        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert_eq!(doubled.total, 7);
    }

    #[test]
    fn test_page_window_small() {
        assert!(page_window(1, 0).is_empty());
        assert!(page_window(1, 1).is_empty());
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_window_centred() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_page_window_near_end() {
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(4, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_page_links() {
        let links = PageLinks::build(1, 3, |n| format!("/x?page={n}")).unwrap();
        assert!(links.prev_disabled);
        assert!(!links.next_disabled);
        assert_eq!(links.next_url, "/x?page=2");
        assert_eq!(links.pages.len(), 3);
        assert!(links.pages.first().unwrap().is_current);

        let last = PageLinks::build(3, 3, |n| format!("/x?page={n}")).unwrap();
        assert!(last.next_disabled);
        assert_eq!(last.prev_url, "/x?page=2");

        assert!(PageLinks::build(1, 1, |n| n.to_string()).is_none());
    }
}
