//! Service error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type returned by services and
//! handlers. Each variant maps to a specific HTTP status code and a
//! structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::store::StoreError;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 3001,
///     "message": "error fetching TMDB data: HTTP status server error (503 Service Unavailable)"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message, including the underlying cause.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Code | Category              | HTTP Status               |
/// |------|-----------------------|---------------------------|
/// | 1001 | Request validation    | 422 Unprocessable Entity  |
/// | 3000 | Internal              | 500 Internal Server Error |
/// | 3001 | Upstream metadata API | 500 Internal Server Error |
/// | 3002 | Document store        | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request body is not a well-formed payload of the expected shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The TMDB request failed in transport, status, or decoding.
    #[error("error fetching TMDB data: {0}")]
    MetadataFetch(String),

    /// A read or write against the document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Internal(_) => 3000,
            Self::MetadataFetch(_) => 3001,
            Self::Store(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MetadataFetch(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(code = self.error_code(), error = %self, "request failed");
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body should be json");
        };
        value
    }

    #[tokio::test]
    async fn metadata_fetch_maps_to_500_with_upstream_text() {
        let err = GatewayError::MetadataFetch("503 Service Unavailable".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 3001);
        let message = body["error"]["message"].as_str().unwrap_or_default();
        assert!(message.contains("error fetching TMDB data"));
        assert!(message.contains("503 Service Unavailable"));
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn invalid_request_maps_to_422() {
        let err = GatewayError::InvalidRequest("missing field `user_id`".to_string());
        assert_eq!(err.error_code(), 1001);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        let message = body["error"]["message"].as_str().unwrap_or_default();
        assert!(message.contains("user_id"));
    }

    #[tokio::test]
    async fn store_error_converts_and_maps_to_500() {
        let err: GatewayError = StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), 3002);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let message = body["error"]["message"].as_str().unwrap_or_default();
        assert!(message.contains("Permission denied"));
    }
}
