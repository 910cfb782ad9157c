//! Response assembly: [`PageResult`] → externally visible body.

use crate::page::PageResult;
use serde::Serialize;

/// JSON body of a paginated response.
///
/// ```json
/// { "content": [...], "page": 0, "size": 100, "totalElements": 250, "totalPages": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePayload<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Zero-based page index
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Matching rows across all pages
    pub total_elements: u64,
    /// Number of pages
    pub total_pages: u64,
}

impl<T> From<PageResult<T>> for PagePayload<T> {
    fn from(result: PageResult<T>) -> Self {
        let (content, page, size, total_elements, total_pages) = result.into_parts();
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

/// Map every [`PageResult`] field verbatim onto a [`PagePayload`].
#[must_use]
pub fn to_payload<T>(result: PageResult<T>) -> PagePayload<T> {
    PagePayload::from(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_payload_keys() {
        let result = PageResult::new(vec![7, 8], 1, 2, 5).unwrap();
        let json = serde_json::to_value(to_payload(result)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "content": [7, 8],
                "page": 1,
                "size": 2,
                "totalElements": 5,
                "totalPages": 3
            })
        );
    }
}
