use axum::Router;
use domain_blueprint::{MockupService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = MockupService::new(
        state.repository.clone(),
        state.mockups.clone(),
        state.rng.clone(),
    );
    handlers::mockup::router(service)
}
