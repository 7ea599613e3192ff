//! Request extractors.
//!
//! axum's own `Json` rejection answers with a plain-text body and a 415/422.
//! [`JsonBody`] answers every unreadable body with 400 and the usual
//! `{ "message": ... }` shape instead.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use smstore_core::validation::validate_id;

/// JSON request body with 400 on any parse failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Checks a path id. `entity` is used in the message, e.g. "Invalid product id".
pub fn parse_id(entity: &str, raw: &str) -> Result<String, ApiError> {
    validate_id("id", raw).map_err(|_| ApiError::BadRequest(format!("Invalid {entity} id")))
}
