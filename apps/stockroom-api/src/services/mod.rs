//! Orchestrators that sequence validation and store calls.
//!
//! Handlers never talk to a store directly; they go through these services.

pub mod product_service;
pub mod sale_service;

pub use product_service::ProductService;
pub use sale_service::SaleService;
