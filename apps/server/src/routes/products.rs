//! Product catalogue endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::{Created, Message};
use crate::error::{ApiError, ApiResult};
use crate::extract::{parse_id, JsonBody};
use crate::AppState;
use smstore_core::validation::{validate_new_product, validate_product_patch};
use smstore_core::{NewProduct, Product, ProductPatch};

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list_all().await?;
    Ok(Json(products))
}

/// In stock and not withdrawn from sale.
async fn list_sellable(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list_sellable().await?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id("product", &id)?;
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewProduct>,
) -> ApiResult<Json<Created>> {
    validate_new_product(&payload)?;
    let product = state.db.products().insert(&payload).await?;
    info!(id = %product.id, name = %product.name_en, "Product created");

    Ok(Json(Created {
        message: "Product created",
        id: product.id,
    }))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> ApiResult<Json<Product>> {
    let id = parse_id("product", &id)?;
    validate_product_patch(&patch)?;
    state
        .db
        .products()
        .update(&id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

/// Succeeds whether or not the product existed.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_id("product", &id)?;
    if state.db.products().delete(&id).await? {
        info!(id = %id, "Product deleted");
    }
    Ok(Json(Message {
        message: "Product deleted",
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/sellable", get(list_sellable))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
