//! Type-safe error codes for API responses.
//!
//! Each code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Malformed request that is not a validation failure
    BadRequest,

    /// Request validation failed
    ValidationError,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Request payload is semantically incorrect for the current state
    UnprocessableEntity,

    /// No session cookie and no session minted by the middleware
    MissingSession,

    /// HTTP method is not allowed for the route
    MethodNotAllowed,

    /// A handler panicked and the panic boundary recovered
    HandlerPanic,

    // Session storage errors (2000s)
    /// Session storage backend failed to read or write
    SessionStorage,

    // Rendering errors (3000s)
    /// Template rendering failed
    RenderError,

    // JSON parsing errors (4000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::MissingSession => "MISSING_SESSION",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::HandlerPanic => "HANDLER_PANIC",
            Self::SessionStorage => "SESSION_STORAGE",
            Self::RenderError => "RENDER_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1999: Client and request errors
    /// - 2000-2999: Session storage errors
    /// - 3000-3999: Rendering errors
    /// - 4000-4999: Serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 1000,
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::UnprocessableEntity => 1009,
            Self::MissingSession => 1012,
            Self::MethodNotAllowed => 1013,
            Self::HandlerPanic => 1099,

            Self::SessionStorage => 2001,

            Self::RenderError => 3001,

            Self::SerdeJsonError => 4001,
        }
    }

    /// Get the default user-facing error message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::UnprocessableEntity => "Request cannot be processed",
            Self::MissingSession => "Session cookie is missing",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::HandlerPanic => "An unexpected error occurred",
            Self::SessionStorage => "Session storage error",
            Self::RenderError => "Failed to render template",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
