//! Readiness check against the configured session store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_blueprint::BlueprintRepository;

/// Readiness check endpoint.
///
/// Probes the session store through the repository, so a missing or
/// read-only session directory reports `not ready`.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "session_store",
        Box::pin(async {
            state
                .repository
                .ping()
                .await
                .map_err(|e| format!("Session store ping failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
