use axum::{Router, middleware};
use axum_helpers::{PanicBoundary, SessionCookie, panic_boundary, session_layer};
use domain_blueprint::messages;

pub mod blueprint;
pub mod health;
pub mod mockup;
pub mod pricing;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Every route runs inside the session layer, so handlers can always
/// extract a `SessionId`, and inside the panic boundary.
pub fn routes(state: &crate::state::AppState) -> Router {
    let environment = &state.config.environment;

    Router::new()
        .nest("/blueprint", blueprint::router(state))
        .nest("/pricing", pricing::router(state))
        .nest("/mockup", mockup::router(state))
        .layer(middleware::from_fn_with_state(
            PanicBoundary {
                message: messages::UNEXPECTED_ERROR,
                expose_details: environment.is_development(),
            },
            panic_boundary,
        ))
        .layer(middleware::from_fn_with_state(
            SessionCookie {
                secure: environment.use_https(),
            },
            session_layer,
        ))
}

/// Creates a router with the /ready endpoint that checks the session store.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::openapi::ApiDoc;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use axum_helpers::{create_router, health_router};
    use core_config::server::ServerConfig;
    use core_config::session::{SessionBackend, SessionConfig};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn config(backend: SessionBackend) -> Config {
        Config {
            app: core_config::app_info!(),
            server: ServerConfig::new("127.0.0.1".to_string(), 0),
            session: SessionConfig {
                backend,
                mock_seed: Some(3),
                ttl: std::time::Duration::from_secs(60),
            },
            environment: Environment::Development,
        }
    }

    fn app(backend: SessionBackend) -> Router {
        let state = AppState::new(config(backend)).unwrap();
        create_router::<ApiDoc>(routes(&state), &state.config.server)
            .unwrap()
            .merge(health_router(state.config.app))
            .merge(ready_router(state))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_first_request_gets_a_session_cookie() {
        let app = app(SessionBackend::Memory);

        let response = app
            .clone()
            .oneshot(get("/api/blueprint/entities"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("blueprint_session="));

        let create = Request::builder()
            .method("POST")
            .uri("/api/blueprint/entities/quick-add")
            .header(header::COOKIE, &cookie)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"entity_name":"Customer","entity_type":"core"}"#))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let list = Request::builder()
            .uri("/api/blueprint/entities")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let json = json_body(app.oneshot(list).await.unwrap()).await;
        assert_eq!(json[0]["name"], "Customer");
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = app(SessionBackend::Memory);

        let health = json_body(app.clone().oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(health["name"], "blueprint_api");

        let response = app.oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ready = json_body(response).await;
        assert_eq!(ready["session_store"], "connected");
    }

    #[tokio::test]
    async fn test_file_backend_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(SessionBackend::File(dir.path().join("sessions")));

        let response = app.oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(dir.path().join("sessions").is_dir());
    }

    #[tokio::test]
    async fn test_openapi_document_lists_domain_paths() {
        let app = app(SessionBackend::Memory);

        let doc = json_body(app.oneshot(get("/api-docs/openapi.json")).await.unwrap()).await;
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/blueprint/entities"));
        assert!(paths.contains_key("/pricing/export"));
        assert!(paths.contains_key("/mockup/theme"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = app(SessionBackend::Memory);

        let response = app.oneshot(get("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"], "NOT_FOUND");
    }
}
