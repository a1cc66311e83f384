//! # Validation Module
//!
//! Pure checks every request passes through before a store is touched.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum)                                                  │
//! │  └── JSON syntax (malformed bodies never reach a service)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Shape: quantity is an integer, product id is well formed          │
//! │  └── Rules: name length, quantity ≥ 1, no duplicate names              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(name)                                                      │
//! │  └── CHECK (quantity >= 0), conditional decrement                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check fails fast with exactly one [`CoreError`] variant.

use serde_json::{Number, Value};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::stock::StockOutcome;
use crate::types::{LineItem, LineItemInput, Product, Sale};
use crate::{MIN_NAME_LENGTH, MIN_QUANTITY};

/// Which operation a sale lookup serves. Decides the miss error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleLookup {
    Read,
    Delete,
}

impl SaleLookup {
    /// Error raised when the lookup finds nothing.
    pub fn miss(&self) -> CoreError {
        match self {
            SaleLookup::Read => CoreError::SaleNotFound,
            SaleLookup::Delete => CoreError::UnprocessableSale,
        }
    }
}

// =============================================================================
// Product Checks
// =============================================================================

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::check_name_length;
///
/// assert!(check_name_length("abcde").is_ok());
/// assert!(check_name_length("abcd").is_err());
/// ```
pub fn check_name_length(name: &str) -> CoreResult<()> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(CoreError::InvalidName);
    }

    Ok(())
}

/// Validates a raw quantity and returns it as an integer.
///
/// ## Rules
/// - A number below 1 → `InvalidQuantity`
/// - Anything that is not an integer number → `InvalidQuantityType`
///
/// Integral floats such as `5.0` count as integers.
pub fn check_valid_quantity(quantity: &Value) -> CoreResult<i64> {
    match quantity {
        Value::Number(n) => match as_integer(n) {
            Some(q) if q < MIN_QUANTITY => Err(CoreError::InvalidQuantity),
            Some(q) => Ok(q),
            None if n.as_f64().is_some_and(|f| f < MIN_QUANTITY as f64) => {
                Err(CoreError::InvalidQuantity)
            }
            None => Err(CoreError::InvalidQuantityType),
        },
        _ => Err(CoreError::InvalidQuantityType),
    }
}

/// Reads a JSON number as an `i64` if it has no fractional part.
fn as_integer(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Unwraps a product store lookup.
pub fn check_exists<T>(record: Option<T>) -> CoreResult<T> {
    record.ok_or(CoreError::InvalidIdFormat)
}

/// Rejects a product name already taken by `existing`.
pub fn check_not_duplicate(existing: Option<&Product>) -> CoreResult<()> {
    match existing {
        Some(_) => Err(CoreError::AlreadyExists),
        None => Ok(()),
    }
}

/// Checks an id is well formed before it reaches a store.
///
/// `on_invalid` is the lookup-path error, since a malformed id and a missing
/// record surface the same way.
pub fn check_id(id: &str, on_invalid: CoreError) -> CoreResult<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(on_invalid)
    }
}

/// Whether `id` is a UUID.
pub fn is_valid_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

// =============================================================================
// Sale Checks
// =============================================================================

/// Validates a sale's line items, in order.
///
/// Stops at the first bad item: later items are never inspected. An item is
/// bad when its quantity is not an integer ≥ 1 or its product id is not a
/// well-formed id. An empty list is rejected too.
pub fn validate_sale_items(items: &[LineItemInput]) -> CoreResult<Vec<LineItem>> {
    if items.is_empty() {
        return Err(CoreError::InvalidSale);
    }

    items.iter().map(validate_line_item).collect()
}

fn validate_line_item(item: &LineItemInput) -> CoreResult<LineItem> {
    let quantity = match &item.quantity {
        Value::Number(n) => as_integer(n),
        _ => None,
    };
    let quantity = quantity
        .filter(|q| *q >= MIN_QUANTITY)
        .ok_or(CoreError::InvalidSale)?;

    let product_id = item
        .product_id
        .as_str()
        .filter(|id| is_valid_id(id))
        .ok_or(CoreError::InvalidSale)?;

    Ok(LineItem::new(product_id, quantity))
}

/// Unwraps the decrement primitive's outcome.
pub fn verify_stock_outcome(outcome: Option<StockOutcome>) -> CoreResult<StockOutcome> {
    outcome.ok_or(CoreError::StockProblem)
}

/// Unwraps a sale store lookup.
pub fn verify_sale_found(sale: Option<Sale>, lookup: SaleLookup) -> CoreResult<Sale> {
    sale.ok_or_else(|| lookup.miss())
}

// =============================================================================
// Unit Tests
// =============================================================================
