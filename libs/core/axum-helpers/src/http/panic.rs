use crate::envelope::{ActionOutcome, RequestKind};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Settings for [`panic_boundary`].
#[derive(Debug, Clone, Copy)]
pub struct PanicBoundary {
    /// User-facing message returned in place of the failed response
    pub message: &'static str,
    /// Include the panic payload in `details` (development only)
    pub expose_details: bool,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Middleware that turns a panicking handler into a user-facing error.
///
/// AJAX requests get `500 {success:false, message, details}`; page requests
/// are redirected to `/?error=<message>`. The panic is logged at `error`.
pub async fn panic_boundary(
    State(boundary): State<PanicBoundary>,
    request: Request,
    next: Next,
) -> Response {
    let kind = RequestKind::from_headers(request.headers());
    let method = request.method().clone();
    let uri = request.uri().clone();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            tracing::error!(%method, %uri, panic = %detail, "Request handler panicked");

            let outcome = ActionOutcome::fault(kind, boundary.message);
            if boundary.expose_details {
                outcome.with_details(detail).into_response()
            } else {
                outcome.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const MESSAGE: &str = "Vyskytla se neočekávaná chyba. Zkuste to prosím znovu.";

    async fn boom() -> &'static str {
        panic!("rate table exploded")
    }

    fn app(expose_details: bool) -> Router {
        Router::new()
            .route("/boom", get(boom))
            .route("/ok", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                PanicBoundary {
                    message: MESSAGE,
                    expose_details,
                },
                panic_boundary,
            ))
    }

    #[tokio::test]
    async fn test_passes_through_normal_responses() {
        let response = app(false)
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ajax_panic_returns_json_500() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .header("X-Requested-With", "XMLHttpRequest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], MESSAGE);
        assert_eq!(json["details"], "rate table exploded");
    }

    #[tokio::test]
    async fn test_ajax_panic_hides_details_in_production() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .header("X-Requested-With", "XMLHttpRequest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_page_panic_redirects_with_error() {
        let response = app(false)
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/?error="));
    }
}
