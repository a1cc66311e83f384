//! # HTTP Routes
//!
//! Thin axum handlers over the services. Handlers parse the request, call one
//! service method, and shape the response; all rules live in the services.
//!
//! ## Endpoints
//! ```text
//! ┌──────────┬──────────────────┬──────────────────────────┬────────────────┐
//! │ Method   │ Path             │ Service call             │ Success        │
//! ├──────────┼──────────────────┼──────────────────────────┼────────────────┤
//! │ GET      │ /                │ (health probe)           │ 200, no body   │
//! │ GET      │ /products        │ ProductService::list     │ 200 {products} │
//! │ POST     │ /products        │ ProductService::create   │ 201 product    │
//! │ GET      │ /products/{id}   │ ProductService::get      │ 200 product    │
//! │ PUT      │ /products/{id}   │ ProductService::update   │ 200 product    │
//! │ DELETE   │ /products/{id}   │ ProductService::delete   │ 200 product    │
//! │ GET      │ /sales           │ SaleService::list_sales  │ 200 {sales}    │
//! │ POST     │ /sales           │ SaleService::create_sale │ 200 sale       │
//! │ GET      │ /sales/{id}      │ SaleService::get_sale    │ 200 sale       │
//! │ PUT      │ /sales/{id}      │ SaleService::update_sale │ 200 sale       │
//! │ DELETE   │ /sales/{id}      │ SaleService::delete_sale │ 200 sale       │
//! └──────────┴──────────────────┴──────────────────────────┴────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use stockroom_core::{LineItemInput, Product, ProductInput, Sale};
use tracing::debug;

use crate::error::ApiResult;
use crate::AppState;

/// Body of `GET /products`.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// Body of `GET /sales`.
#[derive(Debug, Serialize)]
pub struct SaleList {
    pub sales: Vec<Sale>,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/{id}",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProductList>> {
    let products = state.products.list().await?;
    Ok(Json(ProductList { products }))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    debug!(name = %input.name(), "create_product request");

    let product = state.products.create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.get(&id).await?))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(input) = payload?;
    debug!(id = %id, "update_product request");

    Ok(Json(state.products.update(&id, &input).await?))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.delete(&id).await?))
}

// =============================================================================
// Sales
// =============================================================================

async fn list_sales(State(state): State<Arc<AppState>>) -> ApiResult<Json<SaleList>> {
    let sales = state.sales.list_sales().await?;
    Ok(Json(SaleList { sales }))
}

async fn create_sale(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<LineItemInput>>, JsonRejection>,
) -> ApiResult<Json<Sale>> {
    let Json(items) = payload?;
    debug!(items = items.len(), "create_sale request");

    Ok(Json(state.sales.create_sale(&items).await?))
}

async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.sales.get_sale(&id).await?))
}

async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Vec<LineItemInput>>, JsonRejection>,
) -> ApiResult<Json<Sale>> {
    let Json(items) = payload?;
    debug!(id = %id, items = items.len(), "update_sale request");

    Ok(Json(state.sales.update_sale(&id, &items).await?))
}

async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.sales.delete_sale(&id).await?))
}
