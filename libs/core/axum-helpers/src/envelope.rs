//! AJAX-aware responses for mutating endpoints.
//!
//! A browser form post expects a redirect back to the page with a flash
//! message; an `XMLHttpRequest` caller expects JSON. Handlers build one
//! [`ActionOutcome`] and the request kind picks the representation:
//!
//! | kind | success | failure | fault |
//! |---|---|---|---|
//! | Ajax | `200 {success:true, message, data}` | `422 {success:false, message}` | `500 {success:false, message, details}` |
//! | Page | `303 /?success=<msg>` | `303 /?error=<msg>` | `303 /?error=<msg>` |

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use utoipa::ToSchema;

pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const AJAX_MARKER: &str = "XMLHttpRequest";

/// How the caller wants mutating results delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Ajax,
    Page,
}

impl RequestKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_ajax = headers
            .get(REQUESTED_WITH_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case(AJAX_MARKER));

        if is_ajax {
            RequestKind::Ajax
        } else {
            RequestKind::Page
        }
    }

    pub fn is_ajax(self) -> bool {
        matches!(self, RequestKind::Ajax)
    }
}

impl<S> FromRequestParts<S> for RequestKind
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestKind::from_headers(&parts.headers))
    }
}

/// JSON body returned to AJAX callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Diagnostic text for server faults, development only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Result of a user-facing action, rendered according to [`RequestKind`].
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    kind: RequestKind,
    status: StatusCode,
    envelope: ActionEnvelope,
}

impl ActionOutcome {
    fn new(kind: RequestKind, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            envelope: ActionEnvelope {
                success: status.is_success(),
                message: message.into(),
                data: None,
                details: None,
            },
        }
    }

    pub fn success(kind: RequestKind, message: impl Into<String>) -> Self {
        Self::new(kind, StatusCode::OK, message)
    }

    /// The caller can fix this one: unknown entity, blank name, bad input.
    pub fn failure(kind: RequestKind, message: impl Into<String>) -> Self {
        Self::new(kind, StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// The service failed: storage, rendering, a panic.
    pub fn fault(kind: RequestKind, message: impl Into<String>) -> Self {
        Self::new(kind, StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach diagnostic text for AJAX callers. Page redirects drop it.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.envelope.details = Some(details.into());
        self
    }

    /// Attach a payload for AJAX callers. Page redirects drop it.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.envelope.data = Some(value),
            Err(e) => tracing::warn!("Failed to serialize action payload: {}", e),
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.envelope.success
    }

    pub fn message(&self) -> &str {
        &self.envelope.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Flash redirect target for page requests.
    pub fn redirect_location(&self) -> String {
        let key = if self.envelope.success { "success" } else { "error" };
        format!("/?{}={}", key, urlencoding::encode(&self.envelope.message))
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self.kind {
            RequestKind::Ajax => (self.status, Json(self.envelope)).into_response(),
            RequestKind::Page => Redirect::to(&self.redirect_location()).into_response(),
        }
    }
}
