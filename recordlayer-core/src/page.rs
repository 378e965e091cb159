//! Paging parameters and result pages for listing operations.
//!
//! This module provides paging support for large record sets: the [`Page`]
//! struct for result pages and [`PagingParams`] for selecting one.

use serde::{Deserialize, Serialize};
use std::cmp::min;

/// A single page of a paginated listing.
///
/// Holds an independently owned slice of the record set along with metadata
/// for navigating between pages.
///
/// # Type Parameters
///
/// * `T` - The type of items contained in this page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items contained in this page.
    pub items: Vec<T>,
    /// Total count of items across all pages.
    pub count: usize,
    /// The next page number (if more pages exist).
    pub next_page: Option<usize>,
    /// The previous page number (if this is not the first page).
    pub previous_page: Option<usize>,
}

impl<T> Page<T> {
    /// Creates a new builder for constructing a page with custom metadata.
    pub fn builder(items: Vec<T>) -> PageBuilder<T> {
        PageBuilder::new(items)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            next_page: None,
            previous_page: None,
        }
    }
}

/// Builder for constructing [`Page`] instances.
pub struct PageBuilder<T> {
    items: Vec<T>,
    count: usize,
    next_page: Option<usize>,
    previous_page: Option<usize>,
}

impl<T> PageBuilder<T> {
    /// Creates a new builder with the given items.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            count: 0,
            next_page: None,
            previous_page: None,
        }
    }

    /// Sets the total count of items across all pages.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the next page number (or `None` if this is the last page).
    pub fn with_next_page(mut self, next_page: Option<usize>) -> Self {
        self.next_page = next_page;
        self
    }

    /// Sets the previous page number (or `None` if this is the first page).
    pub fn with_previous_page(mut self, previous_page: Option<usize>) -> Self {
        self.previous_page = previous_page;
        self
    }

    /// Builds and returns the final [`Page`] instance.
    pub fn build(self) -> Page<T> {
        Page {
            items: self.items,
            count: self.count,
            next_page: self.next_page,
            previous_page: self.previous_page,
        }
    }
}

/// Parameters selecting one page of a listing.
///
/// Pages are 1-indexed (page 1 is the first page).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingParams {
    /// The page number (1-indexed).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl PagingParams {
    /// Creates new paging parameters.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Returns these parameters with `per_page` clamped to `max_page_size`.
    ///
    /// Engines apply their configured page-size cap through this before
    /// paginating a snapshot.
    pub fn capped(self, max_page_size: usize) -> Self {
        Self {
            page: self.page,
            per_page: min(self.per_page, max_page_size),
        }
    }

    /// Calculates the number of items to skip for this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.per_page
    }

    /// Paginates `items` according to these parameters.
    ///
    /// Extracts the slice of items belonging to this page and wraps it in a
    /// [`Page`] with navigation metadata. An offset beyond the end of `items`
    /// yields an empty default page.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let items: Vec<i32> = (1..=100).collect();
    /// let page = PagingParams::new(2, 10).paginate(items);
    ///
    /// assert_eq!(page.items, vec![11, 12, 13, 14, 15, 16, 17, 18, 19, 20]);
    /// assert_eq!(page.next_page, Some(3));
    /// assert_eq!(page.previous_page, Some(1));
    /// ```
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        if items.is_empty() || self.offset() >= items.len() {
            return Page::default();
        }

        let total = items.len();
        let end = min(self.offset() + self.per_page, total);
        let paginated_items = items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .collect();

        Page::builder(paginated_items)
            .with_count(total)
            .with_next_page(if end < total { Some(self.page + 1) } else { None })
            .with_previous_page(if self.page > 1 { Some(self.page - 1) } else { None })
            .build()
    }
}

impl Default for PagingParams {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}
