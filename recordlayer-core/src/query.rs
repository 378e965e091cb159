//! List-query hooks for listing operations.
//!
//! Listing operations accept caller-supplied selection hooks rather than a
//! query language: a filter predicate and a sort comparator, both applied to
//! the snapshot an engine takes of its record set. A raw query string is also
//! carried for interface compatibility, but it is a reserved pass-through hook
//! and is never interpreted by the engines themselves.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied predicate deciding whether a record is included in a listing.
pub type FilterPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Caller-supplied comparator ordering the records of a listing.
pub type SortComparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Selection hooks for `get_list`/`get_page`.
///
/// # Example
///
/// ```ignore
/// use recordlayer::query::ListQuery;
///
/// let query = ListQuery::new()
///     .with_filter(|user: &User| user.active)
///     .with_sort(|a: &User, b: &User| a.name.cmp(&b.name));
/// ```
pub struct ListQuery<T> {
    query: Option<String>,
    filter: Option<FilterPredicate<T>>,
    sort: Option<SortComparator<T>>,
}

impl<T> ListQuery<T> {
    /// Creates a query with no hooks; applying it returns the record set unchanged.
    pub fn new() -> Self {
        Self {
            query: None,
            filter: None,
            sort: None,
        }
    }

    /// Attaches a raw query string.
    ///
    /// The string is carried verbatim and not interpreted; the filter and sort
    /// hooks are the only selection mechanism.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attaches a filter predicate.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Attaches a sort comparator.
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Returns the raw query string, if one was attached.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Applies the filter and sort hooks to `items` and returns the result.
    pub fn apply(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(filter) = &self.filter {
            items.retain(|item| filter(item));
        }

        if let Some(sort) = &self.sort {
            items.sort_by(|a, b| sort(a, b));
        }

        items
    }
}

impl<T> Default for ListQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ListQuery<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<T> fmt::Debug for ListQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListQuery")
            .field("query", &self.query)
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_filters_and_sorts() {
        let query = ListQuery::new()
            .with_filter(|n: &i32| n % 2 == 0)
            .with_sort(|a: &i32, b: &i32| b.cmp(a));

        assert_eq!(query.apply(vec![3, 2, 8, 5, 4]), vec![8, 4, 2]);
    }

    #[test]
    fn raw_query_string_is_inert() {
        let query = ListQuery::new().with_query("key='Key 1'");

        assert_eq!(query.query(), Some("key='Key 1'"));
        assert_eq!(query.apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}
