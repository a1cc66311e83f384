//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds the domain model of the Stockroom inventory backend:
//! products, sales and their line items, the error taxonomy, and the
//! validation rules every request passes through before any store is touched.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP (axum, stockroom-api)                   │   │
//! │  │    /products ──► ProductService    /sales ──► SaleService       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   stock   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │  Outcome  │  │ CoreError │  │   rules   │  │   │
//! │  │   │   Sale    │  │  Restore  │  │   codes   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, conditional decrement        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, LineItem) and raw request inputs
//! - [`stock`] - Stock adjustment outcomes and the sale-deletion restore policy
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::validation::{check_name_length, check_valid_quantity};
//! use serde_json::json;
//!
//! assert!(check_name_length("Widget-X").is_ok());
//! assert!(check_name_length("abcd").is_err());
//!
//! let quantity = check_valid_quantity(&json!(50)).unwrap();
//! assert_eq!(quantity, 50);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use stock::{RestorePolicy, StockOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of characters in a product name.
pub const MIN_NAME_LENGTH: usize = 5;

/// Minimum quantity for a product on creation/update and for a sale line item.
pub const MIN_QUANTITY: i64 = 1;
