//! Lenient page-number pagination shared by every post listing.
//!
//! A requested page that is missing or not a number resolves to the first
//! page; a number below 1 or past the end resolves to the last page. An empty
//! listing still has one (empty) page.

use serde::Serialize;

/// Fixed listing page size.
pub const POSTS_PER_PAGE: u64 = 10;

/// A page selection as it arrived from the client, not yet checked against a count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    raw: Option<String>,
    per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            raw: None,
            per_page: POSTS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build from the raw `?page=` value.
    pub fn new(raw: Option<&str>) -> Self {
        Self {
            raw: raw.map(str::to_owned),
            ..Self::default()
        }
    }

    pub fn number(number: u64) -> Self {
        Self::new(Some(&number.to_string()))
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Resolve the request against the total number of items.
    pub fn resolve(&self, total: u64) -> PageWindow {
        let num_pages = total.div_ceil(self.per_page).max(1);

        let number = match self.raw.as_deref().map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 => num_pages,
            Some(Ok(n)) => (n as u64).min(num_pages),
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total,
        }
    }
}

/// A resolved page: which slice of the listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    /// 0-based page index, as ORM paginators count.
    pub fn index(&self) -> u64 {
        self.number - 1
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, items: Vec<T>) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total: window.total,
            per_page: window.per_page,
        }
    }

    /// Cut a page out of an already ordered, fully materialized listing.
    pub fn from_ordered(request: &PageRequest, all: Vec<T>) -> Self {
        let window = request.resolve(all.len() as u64);
        let items = all
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.per_page as usize)
            .collect();
        Self::new(window, items)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_items_split_ten_and_three() {
        let items: Vec<u32> = (0..13).collect();

        let first = Page::from_ordered(&PageRequest::default(), items.clone());
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = Page::from_ordered(&PageRequest::number(2), items);
        assert_eq!(second.len(), 3);
        assert_eq!(second.items, vec![10, 11, 12]);
        assert!(!second.has_next());
        assert!(second.has_previous());
    }

    #[test]
    fn test_non_numeric_page_is_first() {
        let window = PageRequest::new(Some("abc")).resolve(25);
        assert_eq!(window.number, 1);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        assert_eq!(PageRequest::number(99).resolve(25).number, 3);
        assert_eq!(PageRequest::new(Some("0")).resolve(25).number, 3);
        assert_eq!(PageRequest::new(Some("-4")).resolve(25).number, 3);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page: Page<u32> = Page::from_ordered(&PageRequest::number(3), vec![]);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_window_offset() {
        let window = PageRequest::new(Some(" 2 ")).resolve(13);
        assert_eq!(window.offset(), 10);
        assert_eq!(window.index(), 1);
    }
}
