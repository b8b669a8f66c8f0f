//! Shared `ToResponse` types referenced from `#[utoipa::path]` annotations.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

/// Session store or template failure. The message never leaks internals.
#[derive(ToResponse)]
#[response(
    description = "Session storage or rendering failed",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "SESSION_STORAGE",
        "message": "Session storage error"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Request body or query failed validation",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "entity_count": [{
                "code": "range",
                "message": "Počet entit musí být mezi 1 a 100.",
                "params": {"min": 1, "max": 100, "value": 101}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Entity, page or stored result does not exist in this session",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Entita nebyla nalezena."
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "The session catalog is empty",
    content_type = "application/json",
    example = json!({
        "code": 1009,
        "error": "UNPROCESSABLE_ENTITY",
        "message": "Žádné entity k výpočtu ceny."
    })
)]
pub struct UnprocessableEntityResponse(pub ErrorResponse);
