//! Error responses shared by both HTTP surfaces
//!
//! Every failure is rendered as `{"error": "<message>"}` with a stable
//! message. Store detail goes to the log only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dday_core::DDayError;
use serde_json::json;
use tracing::{debug, error};

pub const NOT_FOUND: &str = "D-Day not found";
pub const INVALID_BODY: &str = "Invalid request body";
pub const FETCH_ONE_FAILED: &str = "Failed to fetch D-Day";
pub const FETCH_FAILED: &str = "Failed to fetch D-Days";
pub const COUNT_FAILED: &str = "Failed to count D-Days";
pub const CREATE_FAILED: &str = "Failed to create D-Day";
pub const UPDATE_FAILED: &str = "Failed to update D-Day";
pub const DELETE_FAILED: &str = "Failed to delete D-Day";

/// HTTP error with a client-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a core error, using `failure` as the message for store errors
    #[must_use]
    pub fn from_core(err: DDayError, failure: &'static str) -> Self {
        match err {
            DDayError::Validation { message } => Self::bad_request(message),
            DDayError::NotFound { .. } => Self::not_found(),
            DDayError::Store { .. } | DDayError::Configuration { .. } => {
                error!(error = %err, "{failure}");
                Self::internal(failure)
            }
        }
    }
}

/// Closure for `map_err` that maps a core error with a fixed failure message
pub fn or_internal(failure: &'static str) -> impl Fn(DDayError) -> ApiError {
    move |err| ApiError::from_core(err, failure)
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(INVALID_BODY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
