pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error produced by [`AppError`]:
/// - `code`: Integer error code for logging/monitoring (e.g., 1004)
/// - `error`: Machine-readable error identifier (e.g., "NOT_FOUND")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Entita nebyla nalezena.",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),


    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Missing session: {0}")]
    MissingSession(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Session storage error: {0}")]
    SessionStorage(String),

    #[error("Render error: {0}")]
    Render(String),

}

impl AppError {
    /// HTTP status and error code this error maps to.
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::SerdeJson(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::SerdeJsonError),
            AppError::JsonExtractorRejection(e) => (e.status(), ErrorCode::JsonExtraction),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            AppError::MissingSession(_) => (StatusCode::BAD_REQUEST, ErrorCode::MissingSession),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::UnprocessableEntity(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::UnprocessableEntity)
            }
            AppError::SessionStorage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::SessionStorage)
            }
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::RenderError),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, details) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = code.code(), "JSON parsing error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
                (
                    code.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::json!(null))),
                )
            }
            AppError::BadRequest(msg) | AppError::MissingSession(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                (msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                (msg, None)
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!(error_code = code.code(), "Unprocessable entity: {}", msg);
                (msg, None)
            }
            AppError::SessionStorage(msg) => {
                tracing::error!(error_code = code.code(), "Session storage error: {}", msg);
                (code.default_message().to_string(), None)
            }
            AppError::Render(msg) => {
                tracing::error!(error_code = code.code(), "Render error: {}", msg);
                (code.default_message().to_string(), None)
            }
        };

        let mut body = ErrorResponse::new(code, message);
        body.details = details;

        (status, Json(body)).into_response()
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::BAD_REQUEST,
///     "Invalid input".to_string(),
///     ErrorCode::ValidationError,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404_with_message() {
        let response = AppError::NotFound("Entita nebyla nalezena.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], 1004);
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Entita nebyla nalezena.");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_storage_error_hides_internal_message() {
        let response =
            AppError::SessionStorage("permission denied: /sessions/x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "SESSION_STORAGE");
        assert_eq!(json["message"], "Session storage error");
    }

    #[tokio::test]
    async fn test_unprocessable_entity() {
        let response =
            AppError::UnprocessableEntity("Žádné entity k výpočtu ceny.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], 1009);
    }

    #[test]
    fn test_error_response_builder() {
        let body = ErrorResponse::new(ErrorCode::HandlerPanic, "boom")
            .with_details(serde_json::json!({"panic": "boom"}));
        assert_eq!(body.code, 1099);
        assert_eq!(body.error, "HANDLER_PANIC");
        assert!(body.details.is_some());
    }
}
