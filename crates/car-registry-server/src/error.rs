//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use car_registry::RegistryError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by route handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Registry(RegistryError),
    /// Path segment that is not a car id at all.
    UnknownId(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Registry(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Registry(e) => e.to_string(),
            ApiError::UnknownId(_) => "Car not found".to_string(),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Registry(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Registry(e) if !e.is_client_error() => error!("Request failed: {}", e),
            ApiError::Registry(e) => warn!("Rejected request: {:?}", e),
            ApiError::UnknownId(raw) => warn!("Rejected request: bad car id {:?}", raw),
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
