//! # Error Types
//!
//! The domain error taxonomy for Stockroom.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  └── CoreError        - Validation and business rule failures          │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stockroom-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)      │
//! │                                                                         │
//! │  Flow: CoreError / DbError → ApiError → { "err": { code, message } }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each variant carries a stable machine code (see [`CoreError::code`]) and a
//! fixed human-readable message. Lookup failures deliberately collapse
//! "malformed id" and "no such record" into one variant per lookup path.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule and validation failures.
///
/// Raised immediately and propagated unchanged to the boundary; nothing in the
/// orchestration layer recovers from or retries these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product name shorter than [`crate::MIN_NAME_LENGTH`].
    #[error("\"name\" length must be at least 5 characters long")]
    InvalidName,

    /// A product with the same name is already registered.
    #[error("Product already exists")]
    AlreadyExists,

    /// Quantity is a number but below 1.
    #[error("\"quantity\" must be larger than or equal to 1")]
    InvalidQuantity,

    /// Quantity is not an integer number.
    #[error("\"quantity\" must be a number")]
    InvalidQuantityType,

    /// Product id is malformed, or no product has that id.
    #[error("Wrong id format")]
    InvalidIdFormat,

    /// A sale line item has a malformed product id or an invalid quantity.
    ///
    /// ## When This Occurs
    /// - Quantity below 1 or not an integer
    /// - Product id missing or not a well-formed id
    /// - Empty item list
    #[error("Wrong product ID or invalid quantity")]
    InvalidSale,

    /// Sale lookup miss on a read.
    #[error("Sale not found")]
    SaleNotFound,

    /// Sale lookup miss on a delete.
    #[error("Wrong sale ID format")]
    UnprocessableSale,

    /// The decrement primitive refused a stock adjustment.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /sales [{ productId, quantity: 60 }]
    ///      │
    ///      ▼
    /// UPDATE products ... WHERE quantity - 60 >= 0   (stock is 40)
    ///      │
    ///      ▼
    /// 0 rows affected → StockProblem, transaction rolled back
    /// ```
    #[error("Such amount is not permitted to sell")]
    StockProblem,
}

impl CoreError {
    /// Stable machine-readable code surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::SaleNotFound => "not_found",
            CoreError::StockProblem => "stock_problem",
            CoreError::InvalidName
            | CoreError::AlreadyExists
            | CoreError::InvalidQuantity
            | CoreError::InvalidQuantityType
            | CoreError::InvalidIdFormat
            | CoreError::InvalidSale
            | CoreError::UnprocessableSale => "invalid_data",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::InvalidName.to_string(),
            "\"name\" length must be at least 5 characters long"
        );
        assert_eq!(
            CoreError::StockProblem.to_string(),
            "Such amount is not permitted to sell"
        );
        assert_eq!(CoreError::UnprocessableSale.to_string(), "Wrong sale ID format");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CoreError::SaleNotFound.code(), "not_found");
        assert_eq!(CoreError::StockProblem.code(), "stock_problem");
        assert_eq!(CoreError::InvalidSale.code(), "invalid_data");
        assert_eq!(CoreError::AlreadyExists.code(), "invalid_data");
    }
}
