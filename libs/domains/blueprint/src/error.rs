use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::messages;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    #[error("Entity not found by name: {0}")]
    EntityNameNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Mockup page not found: {0}")]
    PageNotFound(String),

    #[error("No entities defined in this session")]
    EmptyCatalog,

    #[error("No entities to price")]
    NothingToPrice,

    #[error("No mockup project in this session")]
    NoMockupProject,

    #[error("No stored pricing in this session")]
    NoPricing,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Template rendering failed: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BlueprintResult<T> = Result<T, BlueprintError>;

impl BlueprintError {
    /// Whether the error is the caller's to fix, as opposed to a fault of
    /// the service.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            BlueprintError::Storage(_) | BlueprintError::Render(_) | BlueprintError::Serialization(_)
        )
    }

    /// Czech message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            BlueprintError::EntityNotFound(_) | BlueprintError::EntityNameNotFound(_) => {
                messages::ENTITY_NOT_FOUND.to_string()
            }
            BlueprintError::TemplateNotFound(_) => messages::TEMPLATE_NOT_FOUND.to_string(),
            BlueprintError::PageNotFound(_) => messages::PAGE_NOT_FOUND.to_string(),
            BlueprintError::EmptyCatalog => messages::NO_ENTITIES_DEFINED.to_string(),
            BlueprintError::NothingToPrice => messages::NOTHING_TO_PRICE.to_string(),
            BlueprintError::NoMockupProject => messages::MOCKUP_MISSING.to_string(),
            BlueprintError::NoPricing => messages::PRICING_MISSING.to_string(),
            BlueprintError::Validation(msg) => msg.clone(),
            BlueprintError::Storage(_)
            | BlueprintError::Render(_)
            | BlueprintError::Serialization(_) => messages::UNEXPECTED_ERROR.to_string(),
        }
    }
}

/// Convert BlueprintError to AppError for standardized error responses
impl From<BlueprintError> for AppError {
    fn from(err: BlueprintError) -> Self {
        let message = err.user_message();
        match err {
            BlueprintError::EntityNotFound(_)
            | BlueprintError::EntityNameNotFound(_)
            | BlueprintError::TemplateNotFound(_)
            | BlueprintError::PageNotFound(_)
            | BlueprintError::NoMockupProject
            | BlueprintError::NoPricing => AppError::NotFound(message),
            BlueprintError::EmptyCatalog | BlueprintError::NothingToPrice => {
                AppError::UnprocessableEntity(message)
            }
            BlueprintError::Validation(_) => AppError::BadRequest(message),
            BlueprintError::Storage(detail) => AppError::SessionStorage(detail),
            BlueprintError::Render(detail) => AppError::Render(detail),
            BlueprintError::Serialization(e) => AppError::SerdeJson(e),
        }
    }
}

impl IntoResponse for BlueprintError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
