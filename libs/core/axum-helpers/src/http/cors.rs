use axum::http::{HeaderName, HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer for the configured origins.
///
/// The layer allows:
/// - Methods GET, POST, PUT, DELETE, OPTIONS
/// - Headers Content-Type, Accept, Cookie, X-Requested-With
/// - Credentials (the session cookie must cross origins)
/// - 1 hour max age
///
/// # Errors
/// Returns `InvalidInput` when the list is empty or an origin is not a valid
/// header value.
pub fn create_cors_layer(origins: &[String]) -> io::Result<CorsLayer> {
    let allowed_origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS origin value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "At least one CORS origin is required",
        ));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}
