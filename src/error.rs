// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

/// Request-scoped API error with a JSON `{"error": ...}` body.
///
/// Credential failures are deliberately coarse: unknown identifier and wrong
/// secret share one message, and store internals are never echoed to the
/// caller.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
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

    /// Uniqueness violation at registration.
    pub fn conflict() -> Self {
        Self::bad_request("User already exists.")
    }

    /// Unknown identifier or wrong secret - one undifferentiated error.
    pub fn invalid_credentials() -> Self {
        Self::bad_request("Invalid credentials.")
    }

    /// A required input field is absent or empty.
    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(format!("{field} is required."))
    }

    /// Backing store failure. Logged server-side, generic to the caller.
    pub fn server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::conflict(),
            other => {
                tracing::error!(error = %other, "user store unavailable");
                ApiError::server_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let conflict = ApiError::conflict();
        assert_eq!(conflict.status, StatusCode::BAD_REQUEST);
        assert_eq!(conflict.message, "User already exists.");

        let creds = ApiError::invalid_credentials();
        assert_eq!(creds.status, StatusCode::BAD_REQUEST);

        let missing = ApiError::missing_field("username");
        assert_eq!(missing.message, "username is required.");
    }

    #[test]
    fn store_conflict_maps_to_400_without_field_leak() {
        let api: ApiError = StoreError::Conflict("email").into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        // Same body whether the clash was on email or username.
        assert_eq!(api.message, "User already exists.");
    }

    #[test]
    fn store_failure_maps_to_generic_500() {
        let api: ApiError = StoreError::Serde(serde_json::from_str::<i32>("x").unwrap_err()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Server error.");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Invalid credentials."}"#);
    }
}
