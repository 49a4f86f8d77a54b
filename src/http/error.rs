//! Mapping of [`RewardError`] to HTTP responses.

use crate::error::RewardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

impl RewardError {
    /// Returns the HTTP status code for this error.
    ///
    /// - CustomerNotFound: 404 Not Found
    /// - Malformed or inconsistent request input: 400 Bad Request
    /// - Store: 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRange { .. }
            | Self::InvalidAmount(_)
            | Self::InvalidDate(_)
            | Self::InvalidCustomerId(_)
            | Self::MissingParameter(_)
            | Self::DuplicateParameter(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RewardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // store failures can carry paths and SQL, keep them in the log only
            Self::Store(e) => {
                error!("Request failed: {e:#}");
                "Internal Server Error".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
