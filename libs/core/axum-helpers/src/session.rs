//! Anonymous cookie sessions.
//!
//! Every visitor gets a random UUID in the `blueprint_session` cookie. The
//! middleware mints one on first contact and the [`SessionId`] extractor hands
//! it to handlers, which use it as the key into the session store.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::fmt;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "blueprint_session";

/// Identifier of the caller's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .map(SessionId)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<SessionId>() {
            return Ok(*id);
        }

        SessionId::from_headers(&parts.headers).ok_or_else(|| {
            AppError::MissingSession(format!("cookie '{}' is not set", SESSION_COOKIE))
        })
    }
}

/// Cookie attributes for the session layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCookie {
    /// Adds the `Secure` attribute; enable behind HTTPS
    pub secure: bool,
}

impl SessionCookie {
    fn header_value(&self, id: SessionId) -> Option<HeaderValue> {
        let cookie: Cookie<'static> = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();

        HeaderValue::from_str(&cookie.to_string()).ok()
    }
}

/// Middleware that guarantees every request carries a [`SessionId`].
///
/// Reads the cookie; when it is missing or not a UUID a fresh id is minted,
/// stored in the request extensions and returned via `Set-Cookie`.
///
/// ```ignore
/// let app = router.layer(axum::middleware::from_fn_with_state(
///     SessionCookie { secure: false },
///     session_layer,
/// ));
/// ```
pub async fn session_layer(
    State(cookie): State<SessionCookie>,
    mut request: Request,
    next: Next,
) -> Response {
    let (id, minted) = match SessionId::from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if minted {
        tracing::debug!(session_id = %id, "Issued new session cookie");
        match cookie.header_value(id) {
            Some(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::warn!(session_id = %id, "Failed to encode session cookie"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo(session: SessionId) -> String {
        session.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn_with_state(
                SessionCookie::default(),
                session_layer,
            ))
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_mints_cookie_when_missing() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("blueprint_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));

        let id = body_text(response).await;
        assert!(set_cookie.contains(&id));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_reuses_existing_cookie() {
        let id = Uuid::new_v4();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_text(response).await, id.to_string());
    }

    #[tokio::test]
    async fn test_replaces_garbage_cookie() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, format!("{}=not-a-uuid", SESSION_COOKIE))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_extractor_rejects_without_middleware() {
        let app = Router::new().route("/", get(echo));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
