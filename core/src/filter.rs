//! Filter normalization: raw query parameters → [`OrderFilter`].
//!
//! # Defaults
//!
//! | Parameter | Default | Parsed as |
//! |-----------|---------|-----------|
//! | `status`  | `DELIVERED` | verbatim string |
//! | `daysAgo` | `30` | `i64`, must be `>= 0` |
//! | `page`    | `0` | `i32`, must be `>= 0` |
//! | `size`    | `100` | `i32`, must be `> 0` |
//!
//! An empty value (`?page=`) counts as absent.

use crate::error::QueryError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Raw, untyped query parameters as they arrive at the boundary.
///
/// Every field is optional; [`OrderFilter::normalize`] applies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderQuery {
    /// Order status to match
    pub status: Option<String>,
    /// Look-back window in days
    pub days_ago: Option<String>,
    /// Zero-based page index
    pub page: Option<String>,
    /// Page size
    pub size: Option<String>,
}

/// Typed, validated filter for one query.
///
/// Invariants: `size > 0` and `since <= now` at normalization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    /// Order status to match (verbatim, no case folding)
    pub status: String,
    /// Only orders created at or after this instant match
    pub since: DateTime<Utc>,
    /// Zero-based page index
    pub page: u32,
    /// Maximum number of rows per page
    pub size: u32,
}

impl OrderFilter {
    /// Status used when the request does not name one.
    pub const DEFAULT_STATUS: &'static str = "DELIVERED";
    /// Look-back window used when `daysAgo` is absent.
    pub const DEFAULT_DAYS_AGO: i64 = 30;
    /// First page.
    pub const DEFAULT_PAGE: u32 = 0;
    /// Page size used when `size` is absent.
    pub const DEFAULT_SIZE: u32 = 100;

    /// Validate and default raw parameters against the given current time.
    ///
    /// Pure: the only input besides `raw` is `now`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidParameter`] when `daysAgo`, `page` or `size`
    /// is not an integer, or is out of range (negative look-back, negative page,
    /// non-positive size, or a look-back that underflows the timestamp range).
    pub fn normalize(raw: &RawOrderQuery, now: DateTime<Utc>) -> Result<Self, QueryError> {
        let status = present(raw.status.as_deref())
            .unwrap_or(Self::DEFAULT_STATUS)
            .to_string();

        let days_ago = parse_param("daysAgo", raw.days_ago.as_deref(), Self::DEFAULT_DAYS_AGO)?;
        let since = since_instant(now, days_ago)?;

        let page = parse_param("page", raw.page.as_deref(), i64::from(Self::DEFAULT_PAGE))
            .and_then(|page| narrow::<i32>("page", page))?;
        let page = u32::try_from(page)
            .map_err(|_| QueryError::invalid_parameter("page", page.to_string(), "must not be negative"))?;

        let size = parse_param("size", raw.size.as_deref(), i64::from(Self::DEFAULT_SIZE))
            .and_then(|size| narrow::<i32>("size", size))?;
        let size = u32::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| QueryError::invalid_parameter("size", size.to_string(), "must be positive"))?;

        Ok(Self {
            status,
            since,
            page,
            size,
        })
    }

    /// Filter with every default applied, relative to `now`.
    #[must_use]
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            status: Self::DEFAULT_STATUS.to_string(),
            since: now - TimeDelta::days(Self::DEFAULT_DAYS_AGO),
            page: Self::DEFAULT_PAGE,
            size: Self::DEFAULT_SIZE,
        }
    }

    /// Row offset of the requested page (`page * size`).
    ///
    /// Both factors fit in 31 bits, so the product always fits in an `i64`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Treat an empty value the same as a missing one.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_param<T>(name: &'static str, raw: Option<&str>, default: T) -> Result<T, QueryError>
where
    T: FromStr,
    T::Err: Display,
{
    match present(raw) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| QueryError::invalid_parameter(name, value, format!("not an integer: {e}"))),
    }
}

fn narrow<T: TryFrom<i64>>(name: &'static str, value: i64) -> Result<T, QueryError> {
    T::try_from(value)
        .map_err(|_| QueryError::invalid_parameter(name, value.to_string(), "out of range"))
}

fn since_instant(now: DateTime<Utc>, days_ago: i64) -> Result<DateTime<Utc>, QueryError> {
    if days_ago < 0 {
        return Err(QueryError::invalid_parameter(
            "daysAgo",
            days_ago.to_string(),
            "must not be negative",
        ));
    }

    TimeDelta::try_days(days_ago)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| QueryError::invalid_parameter("daysAgo", days_ago.to_string(), "out of range"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-31T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn raw(status: Option<&str>, days_ago: Option<&str>, page: Option<&str>, size: Option<&str>) -> RawOrderQuery {
        RawOrderQuery {
            status: status.map(str::to_string),
            days_ago: days_ago.map(str::to_string),
            page: page.map(str::to_string),
            size: size.map(str::to_string),
        }
    }

    #[test]
    fn test_all_defaults() {
        let filter = OrderFilter::normalize(&RawOrderQuery::default(), now()).unwrap();

        assert_eq!(filter.status, "DELIVERED");
        assert_eq!(filter.since, now() - TimeDelta::days(30));
        assert_eq!(filter.page, 0);
        assert_eq!(filter.size, 100);
        assert_eq!(filter, OrderFilter::defaults(now()));
    }

    #[test]
    fn test_explicit_values() {
        let filter =
            OrderFilter::normalize(&raw(Some("SHIPPED"), Some("7"), Some("3"), Some("25")), now()).unwrap();

        assert_eq!(filter.status, "SHIPPED");
        assert_eq!(filter.since, now() - TimeDelta::days(7));
        assert_eq!(filter.page, 3);
        assert_eq!(filter.size, 25);
        assert_eq!(filter.offset(), 75);
    }

    #[test]
    fn test_status_passed_through_verbatim() {
        let filter = OrderFilter::normalize(&raw(Some("delivered "), None, None, None), now()).unwrap();
        assert_eq!(filter.status, "delivered ");
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let filter = OrderFilter::normalize(&raw(Some(""), Some(""), Some(""), Some("")), now()).unwrap();
        assert_eq!(filter, OrderFilter::defaults(now()));
    }

    #[test]
    fn test_zero_days_ago_is_now() {
        let filter = OrderFilter::normalize(&raw(None, Some("0"), None, None), now()).unwrap();
        assert_eq!(filter.since, now());
    }

    #[test]
    fn test_non_numeric_parameters_rejected() {
        for (name, query) in [
            ("daysAgo", raw(None, Some("thirty"), None, None)),
            ("page", raw(None, None, Some("1.5"), None)),
            ("size", raw(None, None, None, Some("ten"))),
        ] {
            match OrderFilter::normalize(&query, now()) {
                Err(QueryError::InvalidParameter { name: rejected, .. }) => assert_eq!(rejected, name),
                other => panic!("expected InvalidParameter for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_page_rejected() {
        let result = OrderFilter::normalize(&raw(None, None, Some("-1"), None), now());
        assert!(matches!(result, Err(QueryError::InvalidParameter { name: "page", .. })));
    }

    #[test]
    fn test_zero_and_negative_size_rejected() {
        for size in ["0", "-5"] {
            let result = OrderFilter::normalize(&raw(None, None, None, Some(size)), now());
            assert!(matches!(result, Err(QueryError::InvalidParameter { name: "size", .. })));
        }
    }

    #[test]
    fn test_size_beyond_i32_rejected() {
        let result = OrderFilter::normalize(&raw(None, None, None, Some("2147483648")), now());
        assert!(matches!(result, Err(QueryError::InvalidParameter { name: "size", .. })));
    }

    #[test]
    fn test_negative_days_ago_rejected() {
        let result = OrderFilter::normalize(&raw(None, Some("-1"), None, None), now());
        assert!(matches!(result, Err(QueryError::InvalidParameter { name: "daysAgo", .. })));
    }

    #[test]
    fn test_huge_days_ago_rejected() {
        let result = OrderFilter::normalize(&raw(None, Some(&i64::MAX.to_string()), None, None), now());
        assert!(matches!(result, Err(QueryError::InvalidParameter { name: "daysAgo", .. })));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let query: RawOrderQuery =
            serde_json::from_str(r#"{"status":"PENDING","daysAgo":"5","size":"10"}"#).unwrap();
        assert_eq!(query, raw(Some("PENDING"), Some("5"), None, Some("10")));
    }

    proptest! {
        #[test]
        fn prop_valid_input_round_trips(days in 0i64..36_500, page in 0u32..=i32::MAX as u32, size in 1u32..=i32::MAX as u32) {
            let query = raw(None, Some(&days.to_string()), Some(&page.to_string()), Some(&size.to_string()));
            let filter = OrderFilter::normalize(&query, now()).unwrap();

            prop_assert_eq!(filter.page, page);
            prop_assert_eq!(filter.size, size);
            prop_assert!(filter.since <= now());
            prop_assert_eq!(now() - filter.since, TimeDelta::days(days));
            prop_assert!(i64::try_from(filter.offset()).is_ok());
        }
    }
}
