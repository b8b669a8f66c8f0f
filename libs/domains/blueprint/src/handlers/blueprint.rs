use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_helpers::{
    ActionEnvelope, ActionOutcome, RequestKind, SessionId, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::BlueprintResult;
use crate::handlers::into_outcome;
use crate::messages;
use crate::models::{
    CreateEntity, Entity, EntityType, EstimateResponse, LoadTemplate, MockDataQuery, Property,
    PropertyType, ProjectTemplate, QuickAddEntity, Relation, RelationType, TypeOption,
    UpdateEntity, type_options,
};
use crate::repository::BlueprintRepository;
use crate::service::CatalogService;

const TAG: &str = "Blueprint";

/// OpenAPI documentation for the entity designer
#[derive(OpenApi)]
#[openapi(
    paths(
        list_entities,
        create_entity,
        clear_entities,
        get_entity,
        update_entity,
        delete_entity,
        quick_add,
        list_templates,
        sample_entities,
        load_template,
        entity_types,
        property_types,
        relation_types,
        estimate,
        mock_data,
    ),
    components(
        schemas(
            Entity,
            Property,
            Relation,
            EntityType,
            PropertyType,
            RelationType,
            CreateEntity,
            UpdateEntity,
            QuickAddEntity,
            LoadTemplate,
            ProjectTemplate,
            TypeOption,
            EstimateResponse,
            ActionEnvelope
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Entity designer endpoints")
    )
)]
pub struct ApiDoc;

/// Create the blueprint router
pub fn router<R: BlueprintRepository + 'static>(service: CatalogService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/entities",
            get(list_entities)
                .post(create_entity)
                .delete(clear_entities),
        )
        .route("/entities/quick-add", post(quick_add))
        .route(
            "/entities/{id}",
            get(get_entity).put(update_entity).delete(delete_entity),
        )
        .route("/templates", get(list_templates))
        .route("/templates/samples", get(sample_entities))
        .route("/templates/load", post(load_template))
        .route("/types/entity", get(entity_types))
        .route("/types/property", get(property_types))
        .route("/types/relation", get(relation_types))
        .route("/estimate", post(estimate))
        .route("/mock-data", get(mock_data))
        .with_state(shared_service)
}

/// List the session's entities
#[utoipa::path(
    get,
    path = "/entities",
    tag = TAG,
    responses(
        (status = 200, description = "Entities in creation order", body = Vec<Entity>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_entities<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<Vec<Entity>>> {
    let entities = service.list_entities(session).await?;
    Ok(Json(entities))
}

/// Create an entity
#[utoipa::path(
    post,
    path = "/entities",
    tag = TAG,
    request_body = CreateEntity,
    responses(
        (status = 200, description = "Entity created; data is the stored entity", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "Invalid input", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn create_entity<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Json(input): Json<CreateEntity>,
) -> ActionOutcome {
    let result = service.create_entity(session, input).await;
    into_outcome(kind, result, |entity| messages::entity_created(&entity.name))
}

/// Delete every entity
#[utoipa::path(
    delete,
    path = "/entities",
    tag = TAG,
    responses(
        (status = 200, description = "Catalog cleared", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn clear_entities<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
) -> ActionOutcome {
    let result = service
        .clear_entities(session)
        .await
        .map(|removed| json!({ "removed": removed }));
    into_outcome(kind, result, |_| messages::ENTITIES_CLEARED.to_string())
}

/// Get an entity by id
#[utoipa::path(
    get,
    path = "/entities/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity found", body = Entity),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_entity<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    Path(id): Path<u64>,
) -> BlueprintResult<Json<Entity>> {
    let entity = service.get_entity(session, id).await?;
    Ok(Json(entity))
}

/// Update an entity; absent fields are kept
#[utoipa::path(
    put,
    path = "/entities/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Entity ID")
    ),
    request_body = UpdateEntity,
    responses(
        (status = 200, description = "Entity updated; data is the stored entity", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "Unknown entity or invalid input", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn update_entity<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Path(id): Path<u64>,
    Json(input): Json<UpdateEntity>,
) -> ActionOutcome {
    let result = service.update_entity(session, id, input).await;
    into_outcome(kind, result, |entity| messages::entity_updated(&entity.name))
}

/// Delete an entity
#[utoipa::path(
    delete,
    path = "/entities/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity deleted", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "Unknown entity", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn delete_entity<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Path(id): Path<u64>,
) -> ActionOutcome {
    let result = service.delete_entity(session, id).await;
    into_outcome(kind, result, |entity| messages::entity_deleted(&entity.name))
}

/// Add an entity with the standard properties of its type
#[utoipa::path(
    post,
    path = "/entities/quick-add",
    tag = TAG,
    request_body = QuickAddEntity,
    responses(
        (status = 200, description = "Entity added", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "Blank name", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn quick_add<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Json(input): Json<QuickAddEntity>,
) -> ActionOutcome {
    let result = service.quick_add(session, input).await;
    into_outcome(kind, result, |entity| messages::entity_quick_added(&entity.name))
}

/// Starter project templates
#[utoipa::path(
    get,
    path = "/templates",
    tag = TAG,
    responses(
        (status = 200, description = "All templates", body = Vec<ProjectTemplate>)
    )
)]
async fn list_templates<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> Json<Vec<ProjectTemplate>> {
    Json(service.templates())
}

/// Demo entities (User, Product, Order)
#[utoipa::path(
    get,
    path = "/templates/samples",
    tag = TAG,
    responses(
        (status = 200, description = "Sample entities", body = Vec<Entity>)
    )
)]
async fn sample_entities<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> Json<Vec<Entity>> {
    Json(service.sample_entities())
}

/// Replace the catalog with a template's entities
#[utoipa::path(
    post,
    path = "/templates/load",
    tag = TAG,
    request_body = LoadTemplate,
    responses(
        (status = 200, description = "Template loaded", body = ActionEnvelope),
        (status = 303, description = "Redirect with a flash message (non-AJAX callers)"),
        (status = 422, description = "Unknown template", body = ActionEnvelope),
        (status = 500, description = "Storage or rendering fault", body = ActionEnvelope)
    )
)]
async fn load_template<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    session: SessionId,
    kind: RequestKind,
    Json(input): Json<LoadTemplate>,
) -> ActionOutcome {
    let result = service.load_template(session, &input.template_name).await;
    into_outcome(kind, result, |template| {
        messages::template_loaded(&template.name, template.prebuilt_entities.len())
    })
}

/// Entity type picker options
#[utoipa::path(
    get,
    path = "/types/entity",
    tag = TAG,
    responses(
        (status = 200, description = "Entity types", body = Vec<TypeOption>)
    )
)]
async fn entity_types() -> Json<Vec<TypeOption>> {
    Json(type_options::<EntityType>())
}

/// Property type picker options
#[utoipa::path(
    get,
    path = "/types/property",
    tag = TAG,
    responses(
        (status = 200, description = "Property types", body = Vec<TypeOption>)
    )
)]
async fn property_types() -> Json<Vec<TypeOption>> {
    Json(type_options::<PropertyType>())
}

/// Relation type picker options
#[utoipa::path(
    get,
    path = "/types/relation",
    tag = TAG,
    responses(
        (status = 200, description = "Relation types", body = Vec<TypeOption>)
    )
)]
async fn relation_types() -> Json<Vec<TypeOption>> {
    Json(type_options::<RelationType>())
}

/// Price a single entity without storing it
#[utoipa::path(
    post,
    path = "/estimate",
    tag = TAG,
    request_body = CreateEntity,
    responses(
        (status = 200, description = "Entity estimate", body = EstimateResponse),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn estimate<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateEntity>,
) -> BlueprintResult<Json<EstimateResponse>> {
    let estimate = service.estimate(input)?;
    Ok(Json(estimate))
}

/// Sample values for a property type
#[utoipa::path(
    get,
    path = "/mock-data",
    tag = TAG,
    params(MockDataQuery),
    responses(
        (status = 200, description = "Generated values", body = Vec<String>),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn mock_data<R: BlueprintRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(query): Query<MockDataQuery>,
) -> BlueprintResult<Json<Vec<String>>> {
    let values = service.mock_values(query).await?;
    Ok(Json(values))
}
