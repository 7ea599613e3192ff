//! Sales history and reporting endpoints, plus the older sale-recording
//! endpoint kept for frontends that post pre-computed lines.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::extract::{parse_id, JsonBody};
use crate::AppState;
use smstore_core::checkout::plan_legacy;
use smstore_core::reports::parse_day;
use smstore_core::{DailySummary, LegacySaleRequest, Sale, SaleDetail, SaleWithCustomer, SaleWithItems};

#[derive(Debug, Serialize)]
struct SaleRecorded {
    message: &'static str,
    sale_id: String,
}

fn sale_not_found() -> ApiError {
    ApiError::NotFound("Sale not found".to_string())
}

/// Full history, newest first.
async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    let sales = state.db.sales().list_all().await?;
    Ok(Json(sales))
}

async fn record_sale(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LegacySaleRequest>,
) -> ApiResult<Json<SaleRecorded>> {
    let plan = plan_legacy(&request)?;
    let recorded = state.db.recorder().record(&plan).await?;

    Ok(Json(SaleRecorded {
        message: "Sale recorded",
        sale_id: recorded.sale_id,
    }))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleWithItems>> {
    let id = parse_id("sale", &id)?;
    state
        .db
        .sales()
        .with_items(&id)
        .await?
        .map(Json)
        .ok_or_else(sale_not_found)
}

/// Totals per UTC day, newest day first.
async fn daily_summary(State(state): State<AppState>) -> ApiResult<Json<Vec<DailySummary>>> {
    let summary = state.db.sales().daily_summary().await?;
    Ok(Json(summary))
}

async fn sales_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<Vec<SaleWithCustomer>>> {
    let day = parse_day(&date)?;
    let sales = state.db.sales().list_by_day(day).await?;
    Ok(Json(sales))
}

async fn sale_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleDetail>> {
    let id = parse_id("sale", &id)?;
    state
        .db
        .sales()
        .detail(&id)
        .await?
        .map(Json)
        .ok_or_else(sale_not_found)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(record_sale))
        .route("/sales/summary", get(daily_summary))
        .route("/sales/by-date/{date}", get(sales_by_date))
        .route("/sales/details/{id}", get(sale_detail))
        .route("/sales/{id}", get(get_sale))
}
