//! # Product Repository
//!
//! Database operations for products, including the stock decrement primitive.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check, then write (two sales can both pass the check) │
//! │     SELECT quantity FROM products WHERE id = ?   → 100                  │
//! │     UPDATE products SET quantity = 40 WHERE id = ?                      │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional update                                    │
//! │     UPDATE products SET quantity = quantity - 60                        │
//! │     WHERE id = ? AND quantity - 60 >= 0                                 │
//! │                                                                         │
//! │  Sale A (60) ──► 1 row affected   → stock 40                           │
//! │  Sale B (60) ──► 0 rows affected  → None → StockProblem                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CHECK (quantity >= 0) constraint on the table backs the same invariant.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::DbResult;
use stockroom_core::{Product, StockOutcome};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let outcome = repo.decrement("uuid-here", 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, quantity, created_at, updated_at
            FROM products
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Replaces a product's name and quantity.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The product as stored after the update
    /// * `Ok(None)` - No product has that id
    /// * `Err(DbError::UniqueViolation)` - Name belongs to another product
    pub async fn replace(&self, id: &str, name: &str, quantity: i64) -> DbResult<Option<Product>> {
        debug!(id = %id, name = %name, quantity = quantity, "Replacing product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?2, quantity = ?3, updated_at = ?4
            WHERE id = ?1
            RETURNING id, name, quantity, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Removes a product and returns what was removed.
    ///
    /// Sales referencing the product are left untouched.
    pub async fn delete(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(id = %id, "Deleting product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = ?1
            RETURNING id, name, quantity, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a stock decrement on a pooled connection.
    ///
    /// See [`ProductRepository::decrement_in`].
    pub async fn decrement(&self, id: &str, delta: i64) -> DbResult<Option<StockOutcome>> {
        let mut conn = self.pool.acquire().await?;
        Self::decrement_in(&mut conn, id, delta).await
    }

    /// The stock decrement primitive.
    ///
    /// Takes `delta` units from the product's stock if that leaves it at 0 or
    /// above; a negative `delta` gives stock back. One statement, so the check
    /// and the write cannot interleave with another decrement.
    ///
    /// A restore that would overflow `i64` is refused like an oversell, since
    /// SQLite would otherwise fall back to a REAL result.
    ///
    /// ## Returns
    /// * `Ok(Some(StockOutcome))` - Stock adjusted
    /// * `Ok(None)` - Insufficient stock, overflow, or unknown product; nothing changed
    pub async fn decrement_in(
        conn: &mut SqliteConnection,
        id: &str,
        delta: i64,
    ) -> DbResult<Option<StockOutcome>> {
        debug!(id = %id, delta = delta, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1
              AND quantity - ?2 >= 0
              AND typeof(quantity - ?2) = 'integer'
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            warn!(id = %id, delta = delta, "Stock decrement refused");
            return Ok(None);
        }

        Ok(Some(StockOutcome {
            product_id: id.to_string(),
            delta,
            rows_affected: result.rows_affected(),
        }))
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
