//! # SMStore Server
//!
//! HTTP/JSON API for a small retail shop: catalogue, customers with running
//! dues, checkout, and sales reporting.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SMStore Server                                  │
//! │                                                                         │
//! │  Browser ──► axum Router ──► routes::* ──► smstore-core (plan/validate)│
//! │              (CORS, trace)        │                                     │
//! │                                   └──────► smstore-db (SQLite)          │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐ │
//! │  │ /api/products│  │/api/customers│  │ /api/sales   │  │ /api/sell  │ │
//! │  │ CRUD,sellable│  │ CRUD, unpaid │  │ history,     │  │ checkout   │ │
//! │  │              │  │ update-due   │  │ summary, day │  │            │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘ │
//! │  ┌──────────────┐  ┌──────────────┐                                    │
//! │  │/api/dashboard│  │ /api/theme   │                                    │
//! │  └──────────────┘  └──────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::ServerConfig`]):
//! - `PORT` - HTTP port (default: 5000)
//! - `BIND_ADDR` - Bind address (default: 0.0.0.0)
//! - `DATABASE_PATH` - SQLite file (default: ./data/smstore.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `SEED_ON_START` - Seed sample data into an empty database (default: true)

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use smstore_db::Database;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Shared application state.
///
/// `Database` wraps a reference-counted pool, so cloning per request is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
