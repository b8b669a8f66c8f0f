use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use axum_helpers::{
    ActionEnvelope, ActionOutcome, RequestKind, SessionId,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnprocessableEntityResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::{BlueprintError, BlueprintResult};
use crate::handlers::into_outcome;
use crate::messages;
use crate::mockup_models::{
    ActivityItem, ComponentPreview, ComponentRequest, ComponentType, DashboardData, EntityDetail,
    EntityForm, EntityRecords, EntityStat, FieldType, FormQuery, MockField, MockRecord,
    MockupComponent, MockupPage, MockupProject, MockupTheme, PageType, RecordsQuery, SampleQuery,
};
use crate::repository::BlueprintRepository;
use crate::service::MockupService;

const TAG: &str = "Mockup";

/// OpenAPI documentation for the UI mockup
#[derive(OpenApi)]
#[openapi(
    paths(
        get_project,
        get_page,
        entity_records,
        entity_form,
        entity_detail,
        sample_records,
        dashboard,
        update_theme,
        generate_component,
    ),
    components(
        schemas(
            MockupProject,
            MockupPage,
            MockupComponent,
            MockupTheme,
            MockField,
            ComponentType,
            PageType,
            FieldType,
            EntityRecords,
            EntityForm,
            EntityDetail,
            DashboardData,
            ActivityItem,
            EntityStat,
            ComponentRequest,
            ComponentPreview
        ),
        responses(
            NotFoundResponse,
            UnprocessableEntityResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Generated UI mockup endpoints")
    )
)]
pub struct ApiDoc;

/// Create the mockup router
pub fn router<R: BlueprintRepository + 'static>(service: MockupService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(get_project))
        .route("/pages/{page_name}", get(get_page))
        .route("/entities/{name}/records", get(entity_records))
        .route("/entities/{name}/form", get(entity_form))
        .route("/entities/{name}/detail/{id}", get(entity_detail))
        .route("/mock-data/{name}", get(sample_records))
        .route("/dashboard", get(dashboard))
        .route("/theme", put(update_theme))
        .route("/components", post(generate_component))
        .with_state(shared_service)
}

fn check<T: Validate>(query: &T) -> BlueprintResult<()> {
    query
        .validate()
        .map_err(|e| BlueprintError::Validation(e.to_string()))
}

/// Mockup project of the session, generated on first request
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Mockup project", body = MockupProject),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_project<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<MockupProject>> {
    let project = service.project(session).await?;
    Ok(Json(project))
}

/// One page of the stored mockup
#[utoipa::path(
    get,
    path = "/pages/{page_name}",
    tag = TAG,
    params(
        ("page_name" = String, Path, description = "Page name, e.g. `Product List`")
    ),
    responses(
        (status = 200, description = "Page found", body = MockupPage),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_page<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Path(page_name): Path<String>,
) -> BlueprintResult<Json<MockupPage>> {
    let page = service.page(session, &page_name).await?;
    Ok(Json(page))
}

/// Generated rows for an entity's list view
#[utoipa::path(
    get,
    path = "/entities/{name}/records",
    tag = TAG,
    params(
        ("name" = String, Path, description = "Entity name (case-insensitive)"),
        RecordsQuery
    ),
    responses(
        (status = 200, description = "Entity and sample rows", body = EntityRecords),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn entity_records<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Path(name): Path<String>,
    Query(query): Query<RecordsQuery>,
) -> BlueprintResult<Json<EntityRecords>> {
    check(&query)?;
    let records = service.records(session, &name, query.count).await?;
    Ok(Json(records))
}

/// Create or edit form for an entity
#[utoipa::path(
    get,
    path = "/entities/{name}/form",
    tag = TAG,
    params(
        ("name" = String, Path, description = "Entity name (case-insensitive)"),
        FormQuery
    ),
    responses(
        (status = 200, description = "Form fields with sample values", body = EntityForm),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn entity_form<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Path(name): Path<String>,
    Query(query): Query<FormQuery>,
) -> BlueprintResult<Json<EntityForm>> {
    let form = service.form(session, &name, query.id).await?;
    Ok(Json(form))
}

/// Detail view of one generated record
#[utoipa::path(
    get,
    path = "/entities/{name}/detail/{id}",
    tag = TAG,
    params(
        ("name" = String, Path, description = "Entity name (case-insensitive)"),
        ("id" = u64, Path, description = "Record ID shown on the page")
    ),
    responses(
        (status = 200, description = "Entity and one record", body = EntityDetail),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn entity_detail<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Path((name, id)): Path<(String, u64)>,
) -> BlueprintResult<Json<EntityDetail>> {
    let detail = service.detail(session, &name, id).await?;
    Ok(Json(detail))
}

/// Sample rows only, for AJAX refreshes
#[utoipa::path(
    get,
    path = "/mock-data/{name}",
    tag = TAG,
    params(
        ("name" = String, Path, description = "Entity name (case-insensitive)"),
        SampleQuery
    ),
    responses(
        (status = 200, description = "Rows as ordered field/value objects"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sample_records<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Path(name): Path<String>,
    Query(query): Query<SampleQuery>,
) -> BlueprintResult<Json<Vec<MockRecord>>> {
    check(&query)?;
    let records = service.sample_records(session, &name, query.count).await?;
    Ok(Json(records))
}

/// Fake usage statistics for the dashboard page
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = TAG,
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardData),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn dashboard<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<DashboardData>> {
    let data = service.dashboard(session).await?;
    Ok(Json(data))
}

/// Replace the theme of the stored mockup
#[utoipa::path(
    put,
    path = "/theme",
    tag = TAG,
    request_body = MockupTheme,
    responses(
        (status = 200, description = "Theme stored; data is the new theme", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "No mockup yet or invalid colors", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn update_theme<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Json(theme): Json<MockupTheme>,
) -> ActionOutcome {
    let result = service.update_theme(session, theme).await;
    into_outcome(kind, result, |_| messages::THEME_UPDATED.to_string())
}

/// Preview one UI component for an entity
#[utoipa::path(
    post,
    path = "/components",
    tag = TAG,
    request_body = ComponentRequest,
    responses(
        (status = 200, description = "Rendered component with its price", body = ComponentPreview),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn generate_component<R: BlueprintRepository>(
    State(service): State<Arc<MockupService<R>>>,
    session: SessionId,
    Json(request): Json<ComponentRequest>,
) -> BlueprintResult<Json<ComponentPreview>> {
    let preview = service.generate_component(session, request).await?;
    Ok(Json(preview))
}
