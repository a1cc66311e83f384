//! # Sale Orchestration
//!
//! Keeps stock consistent with the sales that draw on it.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         create_sale(items)                              │
//! │                                                                         │
//! │  validate_sale_items ──► InvalidSale? ──► return (no stock touched)    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  BEGIN                                                                  │
//! │    for item in items (array order):                                     │
//! │      decrement_in(item) ──► None? ──► drop tx (ROLLBACK), StockProblem │
//! │    insert_in(sale)                                                      │
//! │  COMMIT ──► sale                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delete Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    get_for_update_in(id) ──► None? ──► UnprocessableSale               │
//! │    for item in policy.restorations(items):                              │
//! │      decrement_in(item, -quantity) ──► None? ──► StockProblem          │
//! │    delete_in(id)                                                        │
//! │  COMMIT ──► deleted sale                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Updating a sale replaces its items without touching stock.

use stockroom_core::stock::restoring_delta;
use stockroom_core::validation::{
    check_exists, check_id, validate_sale_items, verify_sale_found, verify_stock_outcome,
    SaleLookup,
};
use stockroom_core::{CoreError, LineItemInput, RestorePolicy, Sale};
use stockroom_db::{commit, Database, ProductRepository, SaleRepository};
use tracing::{info, warn};

use crate::error::ApiResult;

/// Sale service.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
    restore_policy: RestorePolicy,
}

impl SaleService {
    /// Create a new sale service.
    pub fn new(db: Database, restore_policy: RestorePolicy) -> Self {
        SaleService { db, restore_policy }
    }

    /// Records a sale, taking its units out of stock.
    ///
    /// Either every line item's stock is decremented and the sale stored, or
    /// nothing changes.
    pub async fn create_sale(&self, items: &[LineItemInput]) -> ApiResult<Sale> {
        let items = validate_sale_items(items)?;

        let mut tx = self.db.begin().await?;

        for item in &items {
            let outcome =
                ProductRepository::decrement_in(&mut tx, &item.product_id, item.quantity).await?;
            verify_stock_outcome(outcome).inspect_err(|_| {
                warn!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "Sale rejected, rolling back stock changes"
                );
            })?;
        }

        let sale = Sale::new(items);
        SaleRepository::insert_in(&mut tx, &sale).await?;
        commit(tx).await?;

        info!(
            sale_id = %sale.id,
            items = sale.items.len(),
            units = sale.total_units(),
            "Sale created"
        );
        Ok(sale)
    }

    /// Replaces a sale's items.
    ///
    /// Stock is not reconciled against the previous items.
    pub async fn update_sale(&self, id: &str, items: &[LineItemInput]) -> ApiResult<Sale> {
        let items = validate_sale_items(items)?;
        check_id(id, CoreError::InvalidIdFormat)?;

        let mut tx = self.db.begin().await?;
        let sale = check_exists(SaleRepository::replace_items_in(&mut tx, id, &items).await?)?;
        commit(tx).await?;

        info!(sale_id = %sale.id, items = sale.items.len(), "Sale updated");
        Ok(sale)
    }

    /// Removes a sale, giving stock back per the restore policy.
    ///
    /// If a restore cannot be applied the sale is kept and nothing changes.
    pub async fn delete_sale(&self, id: &str) -> ApiResult<Sale> {
        check_id(id, CoreError::UnprocessableSale)?;

        let mut tx = self.db.begin().await?;
        let sale = verify_sale_found(
            SaleRepository::get_for_update_in(&mut tx, id).await?,
            SaleLookup::Delete,
        )?;

        for item in self.restore_policy.restorations(&sale.items) {
            let outcome =
                ProductRepository::decrement_in(&mut tx, &item.product_id, restoring_delta(item))
                    .await?;
            verify_stock_outcome(outcome).inspect_err(|_| {
                warn!(
                    sale_id = %sale.id,
                    product_id = %item.product_id,
                    "Stock restore failed, sale kept"
                );
            })?;
        }

        SaleRepository::delete_in(&mut tx, id).await?;
        commit(tx).await?;

        info!(
            sale_id = %sale.id,
            policy = %self.restore_policy,
            "Sale deleted"
        );
        Ok(sale)
    }

    /// Fetches one sale.
    pub async fn get_sale(&self, id: &str) -> ApiResult<Sale> {
        check_id(id, CoreError::SaleNotFound)?;
        let sale = self.db.sales().get_by_id(id).await?;
        Ok(verify_sale_found(sale, SaleLookup::Read)?)
    }

    /// Lists every sale.
    pub async fn list_sales(&self) -> ApiResult<Vec<Sale>> {
        Ok(self.db.sales().list().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
