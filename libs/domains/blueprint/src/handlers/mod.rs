//! HTTP surface of the blueprint domain.
//!
//! Three routers, each nested by the application: the entity designer
//! (`blueprint`), quotes (`pricing`) and the UI mockup (`mockup`).

use axum_helpers::{ActionOutcome, RequestKind};
use serde::Serialize;

use crate::error::BlueprintResult;

pub mod blueprint;
pub mod mockup;
pub mod pricing;

/// Render a service result for an action endpoint.
///
/// Caller mistakes (unknown entity, blank name, invalid input) become a
/// failure message. Storage and rendering faults are logged and become a
/// fault outcome with the generic message.
pub(crate) fn into_outcome<T: Serialize>(
    kind: RequestKind,
    result: BlueprintResult<T>,
    message: impl FnOnce(&T) -> String,
) -> ActionOutcome {
    match result {
        Ok(value) => ActionOutcome::success(kind, message(&value)).with_data(&value),
        Err(e) if e.is_user_facing() => {
            tracing::debug!(error = %e, "Action rejected");
            ActionOutcome::failure(kind, e.user_message())
        }
        Err(e) => {
            tracing::error!(error = %e, "Action failed");
            ActionOutcome::fault(kind, e.user_message())
        }
    }
}
