//! Storefront color palette.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Theme {
    pub text: &'static str,
    pub background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

pub const THEME: Theme = Theme {
    text: "#0e1a05",
    background: "#e8f0e0",
    primary: "#8bd832",
    secondary: "#99b2d0",
    accent: "#67c2e2",
};

async fn get_theme() -> Json<Theme> {
    Json(THEME)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/theme", get(get_theme))
}
