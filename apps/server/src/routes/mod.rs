//! # Routes
//!
//! One module per resource, each exposing a `router()` that is nested under
//! `/api` here.
//!
//! | Module        | Paths                                              |
//! |---------------|----------------------------------------------------|
//! | [`theme`]     | `/api/theme`                                       |
//! | [`products`]  | `/api/products`, `/sellable`, `/{id}`              |
//! | [`customers`] | `/api/customers`, `/unpaid`, `/{id}`, `/update-due`|
//! | [`sales`]     | `/api/sales`, `/summary`, `/by-date`, `/details`   |
//! | [`sell`]      | `/api/sell`                                        |
//! | [`dashboard`] | `/api/dashboard/owner`, `/employee`                |

use axum::{routing::get, Router};
use serde::Serialize;

use crate::AppState;

pub mod customers;
pub mod dashboard;
pub mod products;
pub mod sales;
pub mod sell;
pub mod theme;

const BANNER: &str = "✅ Store management server is running";

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `{ "message": ..., "_id": ... }` returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    #[serde(rename = "_id")]
    pub id: String,
}

pub fn router() -> Router<AppState> {
    let api = Router::new()
        .merge(theme::router())
        .merge(products::router())
        .merge(customers::router())
        .merge(sales::router())
        .merge(sell::router())
        .merge(dashboard::router());

    Router::new().route("/", get(root)).nest("/api", api)
}

async fn root() -> &'static str {
    BANNER
}
