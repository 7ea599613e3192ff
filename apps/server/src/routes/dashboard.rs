//! Owner and employee dashboards.
//!
//! "Today" starts at local midnight of the machine running the server.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;

use crate::error::ApiResult;
use crate::AppState;
use smstore_core::reports::start_of_day;
use smstore_core::{EmployeeDashboard, OwnerDashboard};

async fn owner_dashboard(State(state): State<AppState>) -> ApiResult<Json<OwnerDashboard>> {
    let since = start_of_day(&Local::now());
    let today = state.db.sales().list_since(since).await?;
    Ok(Json(OwnerDashboard::from_sales(today)))
}

async fn employee_dashboard(State(state): State<AppState>) -> ApiResult<Json<EmployeeDashboard>> {
    let since = start_of_day(&Local::now());
    let today_sales = state.db.sales().list_since(since).await?;
    let unpaid_customers = state.db.customers().list_unpaid().await?;

    Ok(Json(EmployeeDashboard {
        today_sales,
        unpaid_customers,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/owner", get(owner_dashboard))
        .route("/dashboard/employee", get(employee_dashboard))
}
