//! # Stockroom API
//!
//! Product and sale orchestration over SQLite, served over HTTP.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────────────────────────────────────┐│
//! │  │  routes        │  │  services                                      ││
//! │  │  (axum)        │─►│                                                ││
//! │  │                │  │  ProductService        SaleService             ││
//! │  │ • /products    │  │  • create / update     • create_sale (1 tx)    ││
//! │  │ • /sales       │  │  • get / list          • update_sale           ││
//! │  └────────────────┘  │  • delete              • delete_sale (restore) ││
//! │                      └───────────────────────┬────────────────────────┘│
//! │                                              ▼                          │
//! │                      stockroom-core (validation) + stockroom-db (SQLite)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `STOCKROOM_HOST` - Bind interface (default: 0.0.0.0)
//! - `STOCKROOM_PORT` - HTTP port (default: 3000)
//! - `STOCKROOM_DB_PATH` - SQLite file (default: ./stockroom.db)
//! - `STOCKROOM_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `STOCKROOM_RESTORE_POLICY` - `first_item` or `all_items` (default: first_item)

pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use stockroom_core::RestorePolicy;
use stockroom_db::Database;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use services::{ProductService, SaleService};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub products: ProductService,
    pub sales: SaleService,
}

impl AppState {
    /// Wires both services to one database.
    pub fn new(db: Database, restore_policy: RestorePolicy) -> Self {
        AppState {
            products: ProductService::new(db.clone()),
            sales: SaleService::new(db, restore_policy),
        }
    }
}

/// Builds the full HTTP application.
pub fn app(db: Database, restore_policy: RestorePolicy) -> Router {
    routes::router(Arc::new(AppState::new(db, restore_policy)))
}
