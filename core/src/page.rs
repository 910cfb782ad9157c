//! Pagination math and the page result type.

use crate::error::QueryError;

/// Number of pages needed for `total_elements` rows at `size` rows per page.
///
/// `ceil(total_elements / size)`; zero rows means zero pages.
///
/// # Errors
///
/// Returns [`QueryError::InvalidArgument`] if `size` is zero.
///
/// # Example
///
/// ```
/// use order_query_core::compute_total_pages;
///
/// assert_eq!(compute_total_pages(0, 100).unwrap(), 0);
/// assert_eq!(compute_total_pages(100, 100).unwrap(), 1);
/// assert_eq!(compute_total_pages(101, 100).unwrap(), 2);
/// ```
pub fn compute_total_pages(total_elements: u64, size: u32) -> Result<u64, QueryError> {
    if size == 0 {
        return Err(QueryError::InvalidArgument(
            "page size must be positive".to_string(),
        ));
    }
    Ok(total_elements.div_ceil(u64::from(size)))
}

/// One page of a larger ordered result set.
///
/// Immutable once built; `total_pages` is always derived from
/// `total_elements` and `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    content: Vec<T>,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl<T> PageResult<T> {
    /// Assemble a page, deriving `total_pages`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] if `size` is zero or `content`
    /// holds more than `size` items.
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Result<Self, QueryError> {
        let total_pages = compute_total_pages(total_elements, size)?;
        if u64::try_from(content.len()).map_or(true, |len| len > u64::from(size)) {
            return Err(QueryError::InvalidArgument(format!(
                "page holds {} items but size is {size}",
                content.len()
            )));
        }
        Ok(Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        })
    }

    /// Items on this page, in store order.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Matching rows across all pages.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// `ceil(total_elements / size)`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Take the page apart: `(content, page, size, total_elements, total_pages)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u32, u32, u64, u64) {
        (
            self.content,
            self.page,
            self.size,
            self.total_elements,
            self.total_pages,
        )
    }
}
