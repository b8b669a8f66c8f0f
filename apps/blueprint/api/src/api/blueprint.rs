use axum::Router;
use domain_blueprint::{CatalogService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = CatalogService::new(state.repository.clone(), state.rng.clone());
    handlers::blueprint::router(service)
}
