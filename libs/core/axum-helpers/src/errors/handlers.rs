use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Handler for 404 Not Found errors.
///
/// Used as the router fallback.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}

/// Handler for 405 Method Not Allowed errors.
pub async fn method_not_allowed() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::MethodNotAllowed,
        ErrorCode::MethodNotAllowed.default_message(),
    ));

    (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
}
