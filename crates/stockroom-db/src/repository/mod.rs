//! # Repository Module
//!
//! Store implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SaleService                                                           │
//! │       │                                                                 │
//! │       │  let mut tx = db.begin().await?;                               │
//! │       │  ProductRepository::decrement_in(&mut tx, id, qty)             │
//! │       │  SaleRepository::insert_in(&mut tx, &sale)                     │
//! │       ▼                                                                 │
//! │  ProductRepository                  SaleRepository                     │
//! │  ├── list / get_by_id / get_by_name ├── list / get_by_id(_in)          │
//! │  ├── insert / replace / delete      ├── insert(_in)                    │
//! │  └── decrement(_in)                 ├── replace_items_in               │
//! │                                     └── delete_in                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and the stock decrement primitive
//! - [`sale::SaleRepository`] - Sales and their ordered line items

pub mod product;
pub mod sale;
