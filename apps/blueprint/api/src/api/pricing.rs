use axum::Router;
use domain_blueprint::{PricingService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = PricingService::new(state.repository.clone(), state.reports.clone());
    handlers::pricing::router(service)
}
