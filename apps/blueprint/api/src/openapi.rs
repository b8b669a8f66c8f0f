use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::ActionEnvelope)
    ),
    info(
        title = "Blueprint API",
        version = "0.1.0",
        description = "Entity designer, price calculator and UI mockup generator for small business applications"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/blueprint", api = domain_blueprint::handlers::blueprint::ApiDoc),
        (path = "/pricing", api = domain_blueprint::handlers::pricing::ApiDoc),
        (path = "/mockup", api = domain_blueprint::handlers::mockup::ApiDoc)
    )
)]
pub struct ApiDoc;
