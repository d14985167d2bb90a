use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;

use crate::{inventory::InventoryError, registry::RegistryError};

/// Error returned by every handler. Rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Unprocessable(Value),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, Value::String(detail)),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, Value::String(detail)),
            ApiError::Internal(detail) => {
                error!("internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::String(detail))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidSpecification(violations) => {
                ApiError::Unprocessable(json!(violations))
            }
            RegistryError::NotFound(_) => ApiError::NotFound("VM not found".to_string()),
            RegistryError::IdSpaceExhausted => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidItemId(_) => ApiError::Unprocessable(json!(err.to_string())),
            InventoryError::ItemNotFound | InventoryError::ItemMissing => {
                ApiError::NotFound(err.to_string())
            }
            InventoryError::ItemExists => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(json!(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Unprocessable(json!(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(json!(rejection.body_text()))
    }
}

/// `Json` that reports bad bodies as 422 with a `detail` payload.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
