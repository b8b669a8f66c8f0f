use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    SessionId, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnprocessableEntityResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::BlueprintResult;
use crate::models::{
    BreakdownResponse, CostItem, PricingBreakdown, PricingModel, PricingPreview, PricingRequest,
    PricingSummary, QuickBreakdown, QuickEstimateRequest, QuickEstimateResponse, Rate,
    TemplateComparison,
};
use crate::money::{Currency, Money};
use crate::rates::{PropertySurcharges, RateEntry, RateTables, TestingRates};
use crate::repository::BlueprintRepository;
use crate::service::PricingService;

const TAG: &str = "Pricing";
const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// OpenAPI documentation for quotes and estimates
#[derive(OpenApi)]
#[openapi(
    paths(
        preview_pricing,
        calculate_pricing,
        export_report,
        preview_report,
        compare_templates,
        quick_estimate,
        breakdown,
        rates,
    ),
    components(
        schemas(
            Money,
            Currency,
            Rate,
            CostItem,
            PricingBreakdown,
            PricingModel,
            PricingSummary,
            PricingRequest,
            PricingPreview,
            TemplateComparison,
            QuickEstimateRequest,
            QuickEstimateResponse,
            QuickBreakdown,
            BreakdownResponse,
            RateEntry,
            PropertySurcharges,
            TestingRates,
            RateTables
        ),
        responses(
            NotFoundResponse,
            UnprocessableEntityResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Quote and estimate endpoints")
    )
)]
pub struct ApiDoc;

/// Create the pricing router
pub fn router<R: BlueprintRepository + 'static>(service: PricingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(preview_pricing))
        .route("/calculate", post(calculate_pricing))
        .route("/export", get(export_report))
        .route("/preview", get(preview_report))
        .route("/compare", get(compare_templates))
        .route("/quick-estimate", post(quick_estimate))
        .route("/breakdown", get(breakdown))
        .route("/rates", get(rates))
        .with_state(shared_service)
}

/// `Content-Disposition` for a download; plain ASCII name plus the UTF-8 form.
fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// Price the session catalog without storing the quote
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PricingRequest),
    responses(
        (status = 200, description = "Quote for the current catalog", body = PricingSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn preview_pricing<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
    Query(request): Query<PricingRequest>,
) -> BlueprintResult<Json<PricingSummary>> {
    let pricing = service.preview(session, request).await?;
    Ok(Json(pricing.into()))
}

/// Price the session catalog and keep the quote for export
#[utoipa::path(
    post,
    path = "/calculate",
    tag = TAG,
    request_body = PricingRequest,
    responses(
        (status = 200, description = "Stored quote", body = PricingSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn calculate_pricing<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
    ValidatedJson(request): ValidatedJson<PricingRequest>,
) -> BlueprintResult<Json<PricingSummary>> {
    let pricing = service.calculate(session, request).await?;
    Ok(Json(pricing.into()))
}

/// Download the stored quote as markdown
#[utoipa::path(
    get,
    path = "/export",
    tag = TAG,
    responses(
        (status = 200, description = "Markdown quote", content_type = "text/markdown", body = String),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_report<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
) -> BlueprintResult<impl IntoResponse> {
    let export = service.export(session).await?;
    let headers = [
        (header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            attachment_disposition(&export.filename),
        ),
    ];
    Ok((headers, export.body))
}

/// Stored quote with its rendered report
#[utoipa::path(
    get,
    path = "/preview",
    tag = TAG,
    responses(
        (status = 200, description = "Quote and markdown report", body = PricingPreview),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn preview_report<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<PricingPreview>> {
    let preview = service.preview_report(session).await?;
    Ok(Json(preview))
}

/// The current project next to every template
#[utoipa::path(
    get,
    path = "/compare",
    tag = TAG,
    responses(
        (status = 200, description = "Current project first, then templates", body = Vec<TemplateComparison>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn compare_templates<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<Vec<TemplateComparison>>> {
    let rows = service.compare(session).await?;
    Ok(Json(rows))
}

/// Rough figure for a number of plain entities
#[utoipa::path(
    post,
    path = "/quick-estimate",
    tag = TAG,
    request_body = QuickEstimateRequest,
    responses(
        (status = 200, description = "Totals and partial breakdown", body = QuickEstimateResponse),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn quick_estimate<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    ValidatedJson(request): ValidatedJson<QuickEstimateRequest>,
) -> BlueprintResult<Json<QuickEstimateResponse>> {
    let estimate = service.quick_estimate(request)?;
    Ok(Json(estimate))
}

/// Category totals and line items for the session catalog
#[utoipa::path(
    get,
    path = "/breakdown",
    tag = TAG,
    responses(
        (status = 200, description = "Cost breakdown", body = BreakdownResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn breakdown<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
    session: SessionId,
) -> BlueprintResult<Json<BreakdownResponse>> {
    let breakdown = service.breakdown(session).await?;
    Ok(Json(breakdown))
}

/// Every rate the calculator uses
#[utoipa::path(
    get,
    path = "/rates",
    tag = TAG,
    responses(
        (status = 200, description = "Rate tables", body = RateTables)
    )
)]
async fn rates<R: BlueprintRepository>(
    State(service): State<Arc<PricingService<R>>>,
) -> Json<RateTables> {
    Json(service.rates())
}
