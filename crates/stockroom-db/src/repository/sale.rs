//! # Sale Repository
//!
//! Database operations for sales and their ordered line items.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Storage                                      │
//! │                                                                         │
//! │  sales                         sale_items                               │
//! │  ┌──────────────┐              ┌─────────┬──────────┬────────────┬───┐ │
//! │  │ id           │◄─────────────┤ sale_id │ position │ product_id │qty│ │
//! │  │ created_at   │  ON DELETE   │         │  0, 1, … │            │   │ │
//! │  │ updated_at   │  CASCADE     └─────────┴──────────┴────────────┴───┘ │
//! │  └──────────────┘                                                       │
//! │                                                                         │
//! │  `position` keeps items in the order the sale listed them.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods ending in `_in` run on a caller-supplied connection so the sale
//! orchestrator can put them in the same transaction as its stock changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{LineItem, Sale};

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<LineItem>) -> Sale {
        Sale {
            id: self.id,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    sale_id: String,
    product_id: String,
    quantity: i64,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists every sale with its items, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, created_at, updated_at
            FROM sales
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT sale_id, product_id, quantity
            FROM sale_items
            ORDER BY sale_id, position
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut items_by_sale: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in item_rows {
            items_by_sale
                .entry(row.sale_id)
                .or_default()
                .push(LineItem::new(row.product_id, row.quantity));
        }

        let sales: Vec<Sale> = rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(items)
            })
            .collect();

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut conn, id).await
    }

    /// Gets a sale by ID on the given connection.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = Self::items_in(conn, id).await?;
        Ok(Some(row.into_sale(items)))
    }

    /// Gets a sale by ID, taking the write lock first.
    ///
    /// The lookup is itself a write, so a transaction that starts here never
    /// holds a read snapshot that a concurrent writer could invalidate.
    pub async fn get_for_update_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            UPDATE sales
            SET updated_at = updated_at
            WHERE id = ?1
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = Self::items_in(conn, id).await?;
        Ok(Some(row.into_sale(items)))
    }

    /// Line items of a sale, in sale order.
    async fn items_in(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT product_id, quantity
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Inserts a sale and its items on a pooled connection.
    pub async fn insert(&self, sale: &Sale) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        Self::insert_in(&mut tx, sale).await?;
        tx.commit().await?;
        Ok(sale.clone())
    }

    /// Inserts a sale and its items on the given connection.
    pub async fn insert_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, items = sale.items.len(), "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, created_at, updated_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *conn)
        .await?;

        Self::insert_items_in(conn, &sale.id, &sale.items).await
    }

    async fn insert_items_in(
        conn: &mut SqliteConnection,
        sale_id: &str,
        items: &[LineItem],
    ) -> DbResult<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, position, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Replaces a sale's whole item list on the given connection.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - The sale as stored after the replacement
    /// * `Ok(None)` - No sale has that id
    pub async fn replace_items_in(
        conn: &mut SqliteConnection,
        id: &str,
        items: &[LineItem],
    ) -> DbResult<Option<Sale>> {
        debug!(id = %id, items = items.len(), "Replacing sale items");

        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            UPDATE sales
            SET updated_at = ?2
            WHERE id = ?1
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Self::insert_items_in(conn, id, items).await?;

        Ok(Some(row.into_sale(items.to_vec())))
    }

    /// Deletes a sale (items cascade) on the given connection.
    ///
    /// ## Returns
    /// `true` if a sale was removed.
    pub async fn delete_in(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commit, Database, DbConfig};

    const PRODUCT_A: &str = "550e8400-e29b-41d4-a716-446655440000";
    const PRODUCT_B: &str = "6fa459ea-ee8a-3ca4-894e-db77e160355e";

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_preserves_item_order() {
        let db = db().await;
        let sale = Sale::new(vec![
            LineItem::new(PRODUCT_B, 2),
            LineItem::new(PRODUCT_A, 5),
        ]);
        db.sales().insert(&sale).await.unwrap();

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.items, sale.items);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let db = db().await;
        assert!(db.sales().get_by_id(PRODUCT_A).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_items() {
        let db = db().await;
        let sale = Sale::new(vec![LineItem::new(PRODUCT_A, 1)]);
        db.sales().insert(&sale).await.unwrap();

        let new_items = vec![LineItem::new(PRODUCT_B, 3), LineItem::new(PRODUCT_A, 4)];
        let mut tx = db.begin().await.unwrap();
        let replaced = SaleRepository::replace_items_in(&mut tx, &sale.id, &new_items)
            .await
            .unwrap()
            .unwrap();
        commit(tx).await.unwrap();

        assert_eq!(replaced.items, new_items);
        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.items, new_items);
    }

    #[tokio::test]
    async fn test_replace_items_of_missing_sale() {
        let db = db().await;
        let mut tx = db.begin().await.unwrap();
        let replaced = SaleRepository::replace_items_in(&mut tx, PRODUCT_A, &[])
            .await
            .unwrap();
        assert!(replaced.is_none());
    }

    #[tokio::test]
    async fn test_get_for_update_returns_items() {
        let db = db().await;
        let sale = Sale::new(vec![LineItem::new(PRODUCT_A, 2), LineItem::new(PRODUCT_B, 1)]);
        db.sales().insert(&sale).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let locked = SaleRepository::get_for_update_in(&mut tx, &sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locked.items, sale.items);
        assert!(SaleRepository::get_for_update_in(&mut tx, PRODUCT_A)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_items() {
        let db = db().await;
        let sale = Sale::new(vec![LineItem::new(PRODUCT_A, 1)]);
        db.sales().insert(&sale).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        assert!(SaleRepository::delete_in(&mut tx, &sale.id).await.unwrap());
        assert!(!SaleRepository::delete_in(&mut tx, &sale.id).await.unwrap());
        commit(tx).await.unwrap();

        let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let db = db().await;
        let sale = Sale::new(vec![LineItem::new(PRODUCT_A, 1)]);

        {
            let mut tx = db.begin().await.unwrap();
            SaleRepository::insert_in(&mut tx, &sale).await.unwrap();
        }

        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_groups_items_per_sale() {
        let db = db().await;
        let first = Sale::new(vec![LineItem::new(PRODUCT_A, 1), LineItem::new(PRODUCT_B, 2)]);
        let second = Sale::new(vec![LineItem::new(PRODUCT_B, 9)]);
        db.sales().insert(&first).await.unwrap();
        db.sales().insert(&second).await.unwrap();

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 2);
        for sale in sales {
            let expected = if sale.id == first.id { &first } else { &second };
            assert_eq!(sale.items, expected.items);
        }
    }
}
