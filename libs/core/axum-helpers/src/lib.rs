//! # Axum Helpers
//!
//! Shared building blocks for the HTTP surface.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers, panic boundary)
//! - **[`session`]**: Anonymous session cookie middleware and extractor
//! - **[`envelope`]**: AJAX-or-redirect responses for mutating endpoints
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Validated JSON extractor
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config)?;
//!     create_production_app(router, &config, std::time::Duration::from_secs(30), async {}).await
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;
pub mod session;

pub use envelope::{ActionEnvelope, ActionOutcome, RequestKind};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::ValidatedJson;
pub use http::{PanicBoundary, create_cors_layer, panic_boundary, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
pub use session::{SESSION_COOKIE, SessionCookie, SessionId, session_layer};
