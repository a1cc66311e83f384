//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──┤  id (UUID)      │──►│  productId      │       │
//! │  │  name (unique)  │   │  items (ordered)│   │  quantity (≥1)  │       │
//! │  │  quantity (≥0)  │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  ProductInput   │   │ LineItemInput   │  Raw request payloads,      │
//! │  │  name, quantity │   │ productId, qty  │  checked by `validation`    │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Inputs
//! Request payloads keep numeric fields as untyped JSON values. This lets the
//! validation layer tell a non-numeric quantity (`InvalidQuantityType`) apart
//! from an out-of-range one (`InvalidQuantity`) instead of failing inside the
//! deserializer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// Product
// =============================================================================

/// A stock-keeping record with a name and available quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across products.
    pub name: String,

    /// Units in stock. Never negative.
    pub quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last written (including stock adjustments).
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new product with a generated id.
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        let now = Utc::now();
        Product {
            id: generate_id(),
            name: name.into(),
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One `{productId, quantity}` pair inside a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product this line sells.
    pub product_id: String,

    /// Units sold (≥ 1).
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineItem {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A record of one or more line items sold.
///
/// The item list is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Builds a new sale with a generated id.
    pub fn new(items: Vec<LineItem>) -> Self {
        let now = Utc::now();
        Sale {
            id: generate_id(),
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// Total units across all line items.
    pub fn total_units(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Raw Inputs
// =============================================================================

/// Product payload as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Missing names validate as empty.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub quantity: Value,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, quantity: impl Into<Value>) -> Self {
        ProductInput {
            name: Some(name.into()),
            quantity: quantity.into(),
        }
    }

    /// Name as given, or an empty string.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Sale line item as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    #[serde(default)]
    pub product_id: Value,

    #[serde(default)]
    pub quantity: Value,
}

impl LineItemInput {
    pub fn new(product_id: impl Into<Value>, quantity: impl Into<Value>) -> Self {
        LineItemInput {
            product_id: product_id.into(),
            quantity: quantity.into(),
        }
    }
}

/// Generates a new entity id (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_item_serializes_camel_case() {
        let item = LineItem::new("abc", 2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({ "productId": "abc", "quantity": 2 }));
    }

    #[test]
    fn test_sale_total_units() {
        let sale = Sale::new(vec![LineItem::new("a", 2), LineItem::new("b", 5)]);
        assert_eq!(sale.total_units(), 7);
        assert!(Uuid::parse_str(&sale.id).is_ok());
    }

    #[test]
    fn test_inputs_tolerate_missing_fields() {
        let input: ProductInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.name(), "");
        assert!(input.quantity.is_null());

        let item: LineItemInput = serde_json::from_value(json!({ "quantity": "two" })).unwrap();
        assert!(item.product_id.is_null());
        assert_eq!(item.quantity, json!("two"));
    }
}
