use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - OpenAPI documentation (`/api-docs/openapi.json`, ReDoc at `/redoc`,
///   Scalar at `/scalar`)
/// - API routes nested under `/api`
/// - Common middleware (tracing, security headers, CORS, compression)
/// - JSON 404 and 405 fallbacks
///
/// Health endpoints (`/health`, `/ready`) are merged by the app using
/// [`health_router`](super::health_router) and its own ready handler.
///
/// # Errors
/// Returns `InvalidInput` when `server_config.cors_allowed_origins` is empty
/// or contains an invalid header value.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new().nest("/pricing", pricing_router);
/// let router = create_router::<ApiDoc>(api_routes, &config.server)?;
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use axum::routing::get;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = create_cors_layer(&server_config.cors_allowed_origins)?;
    info!(
        "CORS configured with allowed origins: {}",
        server_config.cors_allowed_origins.join(",")
    );

    let openapi = T::openapi();
    let spec = openapi.clone();

    let router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(spec) }),
        )
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(Scalar::with_url("/scalar", openapi))
        .nest("/api", apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve the router with coordinated shutdown and cleanup.
///
/// - Graceful shutdown on SIGINT/SIGTERM
/// - Cleanup future runs after the signal, bounded by `shutdown_timeout`
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     tracing::info!("session store released");
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let mut draining = coordinator.subscribe();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if draining.wait_for(|flag| *flag).await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinator.wait_for_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn config() -> ServerConfig {
        ServerConfig::default()
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api() {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        let router = create_router::<TestDoc>(apis, &config()).unwrap();

        let response = router
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_json_404() {
        let router = create_router::<TestDoc>(Router::new(), &config()).unwrap();

        let response = router
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let router = create_router::<TestDoc>(Router::new(), &config()).unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let router = create_router::<TestDoc>(Router::new(), &config()).unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_create_router_rejects_missing_origins() {
        let mut config = config();
        config.cors_allowed_origins.clear();
        assert!(create_router::<TestDoc>(Router::new(), &config).is_err());
    }
}
