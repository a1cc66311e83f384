//! # Stock Adjustments
//!
//! Types describing how stock moves when sales are created and deleted.
//!
//! ## Decrement Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 decrement(product_id, delta)                        │
//! │                                                                     │
//! │  quantity - delta < 0 ?                                            │
//! │     ├── yes → no change, outcome = None  → StockProblem            │
//! │     └── no  → quantity -= delta, outcome = Some(StockOutcome)      │
//! │                                                                     │
//! │  delta > 0 : a sale takes stock                                    │
//! │  delta < 0 : a deleted sale gives stock back                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::LineItem;

/// Descriptor returned by the decrement primitive when it applied a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOutcome {
    pub product_id: String,
    /// Units removed from stock (negative when stock was given back).
    pub delta: i64,
    pub rows_affected: u64,
}

/// Which line items get their stock back when a sale is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Only the first line item is restored.
    ///
    /// Multi-item sales lose the stock of every other line on deletion.
    /// Kept as the default so existing deployments see no change.
    #[default]
    FirstItem,

    /// Every line item is restored.
    AllItems,
}

impl RestorePolicy {
    /// Line items whose stock is given back, in sale order.
    pub fn restorations<'a>(&self, items: &'a [LineItem]) -> &'a [LineItem] {
        match self {
            RestorePolicy::FirstItem => items.get(..1).unwrap_or(items),
            RestorePolicy::AllItems => items,
        }
    }

    /// Wire/config name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestorePolicy::FirstItem => "first_item",
            RestorePolicy::AllItems => "all_items",
        }
    }
}

impl fmt::Display for RestorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_item" => Ok(RestorePolicy::FirstItem),
            "all_items" => Ok(RestorePolicy::AllItems),
            other => Err(format!("unknown restore policy: {}", other)),
        }
    }
}

/// Stock delta that gives back what `item` took.
pub fn restoring_delta(item: &LineItem) -> i64 {
    -item.quantity
}

// =============================================================================
// Unit Tests
// =============================================================================
