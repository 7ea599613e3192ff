//! Checkout.
//!
//! ```text
//! POST /api/sell { cart, customer, paymentType, total }
//!      │
//!      ├─ plan_checkout     (smstore-core: prices, status, customer ref)
//!      └─ recorder.record   (smstore-db: customer, sale, lines + stock, due)
//! ```

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;
use smstore_core::checkout::plan_checkout;
use smstore_core::CheckoutRequest;

#[derive(Debug, Serialize)]
struct SellRecorded {
    message: &'static str,
    sale_id: String,
    customer_id: Option<String>,
}

async fn sell(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> ApiResult<Json<SellRecorded>> {
    let plan = plan_checkout(&request)?;
    let recorded = state.db.recorder().record(&plan).await?;

    Ok(Json(SellRecorded {
        message: "Sell recorded",
        sale_id: recorded.sale_id,
        customer_id: recorded.customer_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sell", post(sell))
}
