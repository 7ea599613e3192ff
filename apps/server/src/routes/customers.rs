//! Customer endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{Created, Message};
use crate::error::{ApiError, ApiResult};
use crate::extract::{parse_id, JsonBody};
use crate::AppState;
use smstore_core::validation::{validate_customer_patch, validate_new_customer};
use smstore_core::{Customer, CustomerPatch, Money, NewCustomer};

/// Body of `PUT /api/customers/{id}/update-due`. A missing value clears the due.
#[derive(Debug, Default, Deserialize)]
struct DueUpdate {
    #[serde(default)]
    new_due: Money,
}

fn customer_not_found() -> ApiError {
    ApiError::NotFound("Customer not found".to_string())
}

async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let customers = state.db.customers().list_all().await?;
    Ok(Json(customers))
}

async fn list_unpaid(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let customers = state.db.customers().list_unpaid().await?;
    Ok(Json(customers))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id("customer", &id)?;
    state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(customer_not_found)
}

async fn create_customer(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewCustomer>,
) -> ApiResult<Json<Created>> {
    validate_new_customer(&payload)?;
    let customer = state.db.customers().insert(&payload).await?;
    info!(id = %customer.id, name = %customer.name, "Customer created");

    Ok(Json(Created {
        message: "Customer created",
        id: customer.id,
    }))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<CustomerPatch>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id("customer", &id)?;
    validate_customer_patch(&patch)?;
    state
        .db
        .customers()
        .update(&id, &patch)
        .await?
        .map(Json)
        .ok_or_else(customer_not_found)
}

/// Overwrites the running due, e.g. after the customer settles up.
async fn update_due(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<DueUpdate>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id("customer", &id)?;
    let customer = state
        .db
        .customers()
        .set_due(&id, body.new_due)
        .await?
        .ok_or_else(customer_not_found)?;

    info!(id = %customer.id, due = %customer.total_due, "Customer due set");
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_id("customer", &id)?;
    if state.db.customers().delete(&id).await? {
        info!(id = %id, "Customer deleted");
    }
    Ok(Json(Message {
        message: "Customer deleted",
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/unpaid", get(list_unpaid))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/{id}/update-due", put(update_due))
}
