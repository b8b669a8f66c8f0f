//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Validates the request body using the `validator` crate's `Validate` trait.
/// Returns structured validation errors if validation fails.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct QuickAdd {
///     #[validate(length(min = 1, max = 100))]
///     entity_name: String,
/// }
///
/// async fn quick_add(ValidatedJson(payload): ValidatedJson<QuickAdd>) -> String {
///     payload.entity_name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Flatten validator output into `{ field: [{code, message, params}] }`.
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(error_messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| e.into_response())?;

        data.validate().map_err(|e| {
            let error_response = ErrorResponse::new(
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message(),
            )
            .with_details(validation_details(&e));

            (StatusCode::BAD_REQUEST, axum::Json(error_response)).into_response()
        })?;

        Ok(ValidatedJson(data))
    }
}
