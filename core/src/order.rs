//! The order-summary read projection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only summary of one order, joined with its customer and product.
///
/// Produced by the repository adapter and passed through to the response untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier
    pub order_id: i64,
    /// Name of the ordering customer
    pub customer_name: String,
    /// Name of the ordered product
    pub product_name: String,
    /// Units ordered
    pub quantity: i32,
    /// Order total
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Order status (e.g. `DELIVERED`)
    pub order_status: String,
    /// When the order was placed
    pub order_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serializes_camel_case_with_numeric_amount() {
        let summary = OrderSummary {
            order_id: 42,
            customer_name: "Alice".to_string(),
            product_name: "Widget".to_string(),
            quantity: 3,
            total_amount: Decimal::from_str("59.97").unwrap(),
            order_status: "DELIVERED".to_string(),
            order_date: DateTime::parse_from_rfc3339("2025-01-15T08:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["orderId"], 42);
        assert_eq!(json["customerName"], "Alice");
        assert_eq!(json["productName"], "Widget");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["totalAmount"], 59.97);
        assert_eq!(json["orderStatus"], "DELIVERED");
        assert_eq!(json["orderDate"], "2025-01-15T08:30:00Z");
    }
}
