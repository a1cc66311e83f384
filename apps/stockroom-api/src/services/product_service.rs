//! Product orchestration.
//!
//! Validation order for writes is name, then quantity, then id. The unique
//! index on `products.name` backs the duplicate check, so a name taken between
//! the check and the write still surfaces as `AlreadyExists`.

use stockroom_core::validation::{
    check_exists, check_id, check_name_length, check_not_duplicate, check_valid_quantity,
};
use stockroom_core::{CoreError, Product, ProductInput};
use stockroom_db::{Database, DbError};
use tracing::info;

use crate::error::{ApiError, ApiResult};

/// Product service.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Create a new product service.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Registers a new product.
    pub async fn create(&self, input: &ProductInput) -> ApiResult<Product> {
        check_name_length(input.name())?;
        let quantity = check_valid_quantity(&input.quantity)?;

        let existing = self.db.products().get_by_name(input.name()).await?;
        check_not_duplicate(existing.as_ref())?;

        let product = self
            .db
            .products()
            .insert(&Product::new(input.name(), quantity))
            .await
            .map_err(name_taken)?;

        info!(id = %product.id, name = %product.name, quantity = product.quantity, "Product created");
        Ok(product)
    }

    /// Fetches one product.
    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        check_id(id, CoreError::InvalidIdFormat)?;
        let product = self.db.products().get_by_id(id).await?;
        Ok(check_exists(product)?)
    }

    /// Lists every product.
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    /// Replaces a product's name and quantity.
    pub async fn update(&self, id: &str, input: &ProductInput) -> ApiResult<Product> {
        check_name_length(input.name())?;
        let quantity = check_valid_quantity(&input.quantity)?;
        check_id(id, CoreError::InvalidIdFormat)?;

        let product = self
            .db
            .products()
            .replace(id, input.name(), quantity)
            .await
            .map_err(name_taken)?;
        let product = check_exists(product)?;

        info!(id = %product.id, name = %product.name, quantity = product.quantity, "Product updated");
        Ok(product)
    }

    /// Removes a product and returns it.
    ///
    /// Sales that reference the product are left as they are.
    pub async fn delete(&self, id: &str) -> ApiResult<Product> {
        check_id(id, CoreError::InvalidIdFormat)?;
        let product = check_exists(self.db.products().delete(id).await?)?;

        info!(id = %product.id, name = %product.name, "Product deleted");
        Ok(product)
    }
}

/// Maps a unique-index hit on the name to the domain error.
fn name_taken(err: DbError) -> ApiError {
    if err.is_unique_violation() {
        CoreError::AlreadyExists.into()
    } else {
        err.into()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockroom_db::DbConfig;

    const MISSING_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    async fn service() -> ProductService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductService::new(db)
    }

    fn core(err: ApiError) -> CoreError {
        err.core().cloned().expect("expected a domain error")
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let service = service().await;

        let created = service
            .create(&ProductInput::new("Widget-X", 50))
            .await
            .unwrap();
        assert_eq!(created.name, "Widget-X");
        assert_eq!(created.quantity, 50);

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Widget-X");
        assert_eq!(fetched.quantity, 50);
    }

    #[tokio::test]
    async fn test_name_length_boundary() {
        let service = service().await;

        let err = service.create(&ProductInput::new("abcd", 1)).await.unwrap_err();
        assert_eq!(core(err), CoreError::InvalidName);

        assert!(service.create(&ProductInput::new("abcde", 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_name_is_invalid() {
        let service = service().await;
        let input: ProductInput = serde_json::from_value(json!({ "quantity": 3 })).unwrap();

        let err = service.create(&input).await.unwrap_err();
        assert_eq!(core(err), CoreError::InvalidName);
    }

    #[tokio::test]
    async fn test_quantity_rules() {
        let service = service().await;

        let err = service.create(&ProductInput::new("Widget-X", 0)).await.unwrap_err();
        assert_eq!(core(err), CoreError::InvalidQuantity);

        let err = service
            .create(&ProductInput::new("Widget-X", "ten"))
            .await
            .unwrap_err();
        assert_eq!(core(err), CoreError::InvalidQuantityType);
    }

    #[tokio::test]
    async fn test_integral_float_quantity_accepted() {
        let service = service().await;
        let product = service
            .create(&ProductInput::new("Widget-X", 5.0))
            .await
            .unwrap();
        assert_eq!(product.quantity, 5);
    }

    #[tokio::test]
    async fn test_name_checked_before_quantity() {
        let service = service().await;
        let err = service.create(&ProductInput::new("abc", "ten")).await.unwrap_err();
        assert_eq!(core(err), CoreError::InvalidName);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let service = service().await;
        service.create(&ProductInput::new("Widget-X", 1)).await.unwrap();

        let err = service.create(&ProductInput::new("Widget-X", 9)).await.unwrap_err();
        assert_eq!(core(err), CoreError::AlreadyExists);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_malformed_or_missing_id() {
        let service = service().await;

        for id in ["not-an-id", MISSING_ID] {
            let err = service.get(id).await.unwrap_err();
            assert_eq!(core(err), CoreError::InvalidIdFormat);
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let service = service().await;
        let product = service.create(&ProductInput::new("Widget-X", 5)).await.unwrap();

        let updated = service
            .update(&product.id, &ProductInput::new("Widget-Y", 12))
            .await
            .unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Widget-Y");
        assert_eq!(updated.quantity, 12);
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let service = service().await;

        let err = service
            .update("not-an-id", &ProductInput::new("abc", 1))
            .await
            .unwrap_err();
        assert_eq!(core(err), CoreError::InvalidName);

        let err = service
            .update(MISSING_ID, &ProductInput::new("Widget-X", 1))
            .await
            .unwrap_err();
        assert_eq!(core(err), CoreError::InvalidIdFormat);
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name() {
        let service = service().await;
        service.create(&ProductInput::new("Widget-X", 1)).await.unwrap();
        let other = service.create(&ProductInput::new("Gadget-Y", 1)).await.unwrap();

        let err = service
            .update(&other.id, &ProductInput::new("Widget-X", 1))
            .await
            .unwrap_err();
        assert_eq!(core(err), CoreError::AlreadyExists);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product() {
        let service = service().await;
        let product = service.create(&ProductInput::new("Widget-X", 5)).await.unwrap();

        let deleted = service.delete(&product.id).await.unwrap();
        assert_eq!(deleted.id, product.id);

        let err = service.delete(&product.id).await.unwrap_err();
        assert_eq!(core(err), CoreError::InvalidIdFormat);
    }
}
