use axum_helpers::SessionId;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::error::{BlueprintError, BlueprintResult};
use crate::mock_data::MockDataGenerator;
use crate::mockup::{MockupRenderer, build_mockup_project};
use crate::mockup_models::{
    ComponentPreview, ComponentRequest, DashboardData, EntityDetail, EntityForm, EntityRecords,
    MockRecord, MockupPage, MockupProject, MockupTheme,
};
use crate::models::{
    BreakdownResponse, CreateEntity, Entity, EntityCatalog, EntityType, EstimateResponse,
    MockDataQuery, PricingModel, PricingPreview, PricingRequest, ProjectTemplate,
    QuickAddEntity, QuickBreakdown, QuickEstimateRequest, QuickEstimateResponse,
    TemplateComparison, UpdateEntity,
};
use crate::pricing::{calculate_pricing, estimate_entity_cost, estimate_entity_hours, refresh_estimates};
use crate::rates::RateTables;
use crate::report::{ReportRenderer, export_filename};
use crate::repository::BlueprintRepository;
use crate::templates::{entity_from_template, find_template, project_templates, sample_entities};
use crate::messages;

/// Random source shared by every request of the process
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Seeded when `seed` is given, otherwise from the OS.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Arc::new(Mutex::new(rng))
}

/// Run `f` with a generator over the shared RNG. The lock is held only for
/// the synchronous call.
async fn with_generator<T>(
    rng: &SharedRng,
    f: impl FnOnce(&mut MockDataGenerator<&mut StdRng>) -> T,
) -> T {
    let mut rng = rng.lock().await;
    let mut generator = MockDataGenerator::new(&mut *rng, Utc::now().date_naive());
    f(&mut generator)
}

/// First human-readable message of a validation failure.
fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

fn validate<T: Validate>(input: &T) -> BlueprintResult<()> {
    input
        .validate()
        .map_err(|e| BlueprintError::Validation(validation_message(&e)))
}

/// Service layer for the entity catalog
pub struct CatalogService<R: BlueprintRepository> {
    repository: Arc<R>,
    rng: SharedRng,
}

impl<R: BlueprintRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>, rng: SharedRng) -> Self {
        Self { repository, rng }
    }

    pub async fn list_entities(&self, session: SessionId) -> BlueprintResult<Vec<Entity>> {
        Ok(self.repository.load_catalog(session).await?.into_entities())
    }

    pub async fn get_entity(&self, session: SessionId, id: u64) -> BlueprintResult<Entity> {
        self.repository
            .load_catalog(session)
            .await?
            .get(id)
            .cloned()
            .ok_or(BlueprintError::EntityNotFound(id))
    }

    /// Validate, price and append a new entity
    pub async fn create_entity(
        &self,
        session: SessionId,
        input: CreateEntity,
    ) -> BlueprintResult<Entity> {
        validate(&input)?;

        let mut entity = input.into_entity(Utc::now());
        refresh_estimates(&mut entity);
        self.insert(session, entity).await
    }

    /// Add an entity with the standard property set for its type
    pub async fn quick_add(
        &self,
        session: SessionId,
        input: QuickAddEntity,
    ) -> BlueprintResult<Entity> {
        let name = input.entity_name.trim();
        if name.is_empty() {
            return Err(BlueprintError::Validation(
                messages::ENTITY_NAME_REQUIRED.to_string(),
            ));
        }

        let entity = entity_from_template(name, input.entity_type, Utc::now());
        self.insert(session, entity).await
    }

    async fn insert(&self, session: SessionId, entity: Entity) -> BlueprintResult<Entity> {
        let mut catalog = self.repository.load_catalog(session).await?;
        let created = catalog.insert(entity).clone();
        self.repository.save_catalog(session, &catalog).await?;

        info!(
            session_id = %session,
            entity_id = created.id,
            entity_name = %created.name,
            "Created entity"
        );
        Ok(created)
    }

    pub async fn update_entity(
        &self,
        session: SessionId,
        id: u64,
        input: UpdateEntity,
    ) -> BlueprintResult<Entity> {
        validate(&input)?;

        let mut catalog = self.repository.load_catalog(session).await?;
        let entity = catalog
            .get_mut(id)
            .ok_or(BlueprintError::EntityNotFound(id))?;
        entity.apply_update(input);
        refresh_estimates(entity);
        let updated = entity.clone();

        self.repository.save_catalog(session, &catalog).await?;
        info!(session_id = %session, entity_id = id, "Updated entity");
        Ok(updated)
    }

    pub async fn delete_entity(&self, session: SessionId, id: u64) -> BlueprintResult<Entity> {
        let mut catalog = self.repository.load_catalog(session).await?;
        let removed = catalog
            .remove(id)
            .ok_or(BlueprintError::EntityNotFound(id))?;

        self.repository.save_catalog(session, &catalog).await?;
        info!(session_id = %session, entity_id = id, "Deleted entity");
        Ok(removed)
    }

    /// Remove every entity; returns how many there were
    pub async fn clear_entities(&self, session: SessionId) -> BlueprintResult<usize> {
        let mut catalog = self.repository.load_catalog(session).await?;
        let count = catalog.len();
        catalog.clear();

        self.repository.save_catalog(session, &catalog).await?;
        info!(session_id = %session, count, "Cleared entities");
        Ok(count)
    }

    /// Replace the catalog with a template's entities, renumbered from 1
    pub async fn load_template(
        &self,
        session: SessionId,
        template_name: &str,
    ) -> BlueprintResult<ProjectTemplate> {
        let template = find_template(template_name, Utc::now())
            .ok_or_else(|| BlueprintError::TemplateNotFound(template_name.to_string()))?;

        let mut catalog = self.repository.load_catalog(session).await?;
        catalog.replace_all(template.prebuilt_entities.clone());
        self.repository.save_catalog(session, &catalog).await?;

        info!(
            session_id = %session,
            template = %template.name,
            count = catalog.len(),
            "Loaded template"
        );
        Ok(template)
    }

    pub fn templates(&self) -> Vec<ProjectTemplate> {
        project_templates(Utc::now())
    }

    pub fn sample_entities(&self) -> Vec<Entity> {
        sample_entities(Utc::now())
    }

    /// Price a single entity without storing it
    pub fn estimate(&self, input: CreateEntity) -> BlueprintResult<EstimateResponse> {
        validate(&input)?;

        let entity = input.into_entity(Utc::now());
        let cost = estimate_entity_cost(&entity);
        Ok(EstimateResponse {
            cost,
            formatted: cost.formatted(),
            hours: estimate_entity_hours(&entity),
        })
    }

    pub async fn mock_values(&self, query: MockDataQuery) -> BlueprintResult<Vec<String>> {
        validate(&query)?;

        Ok(with_generator(&self.rng, |generator| {
            generator.generate_values(query.property_type, query.count)
        })
        .await)
    }
}

/// Name and body of an exported quote
#[derive(Debug, Clone, PartialEq)]
pub struct ReportExport {
    pub filename: String,
    pub body: String,
}

const CURRENT_PROJECT_NAME: &str = "Váš aktuální projekt";
const CURRENT_PROJECT_DESCRIPTION: &str = "Aktuálně navržené entity";

/// Service layer for quotes and estimates
pub struct PricingService<R: BlueprintRepository> {
    repository: Arc<R>,
    reports: ReportRenderer,
}

impl<R: BlueprintRepository> PricingService<R> {
    pub fn new(repository: Arc<R>, reports: ReportRenderer) -> Self {
        Self {
            repository,
            reports,
        }
    }

    /// Price the session catalog without storing the result
    pub async fn preview(
        &self,
        session: SessionId,
        request: PricingRequest,
    ) -> BlueprintResult<PricingModel> {
        validate(&request)?;

        let catalog = self.repository.load_catalog(session).await?;
        if catalog.is_empty() {
            return Err(BlueprintError::EmptyCatalog);
        }

        Ok(calculate_pricing(
            catalog.into_entities(),
            request.project_name,
            request.client_name,
            Utc::now(),
        ))
    }

    /// Price the session catalog and keep the quote for export
    pub async fn calculate(
        &self,
        session: SessionId,
        request: PricingRequest,
    ) -> BlueprintResult<PricingModel> {
        validate(&request)?;

        let catalog = self.repository.load_catalog(session).await?;
        if catalog.is_empty() {
            return Err(BlueprintError::NothingToPrice);
        }

        let pricing = calculate_pricing(
            catalog.into_entities(),
            request.project_name,
            request.client_name,
            Utc::now(),
        );
        self.repository.save_pricing(session, &pricing).await?;

        info!(
            session_id = %session,
            project = %pricing.project_name,
            total_cents = pricing.total_cost().amount,
            "Calculated pricing"
        );
        Ok(pricing)
    }

    pub async fn stored_pricing(&self, session: SessionId) -> BlueprintResult<PricingModel> {
        self.repository
            .load_pricing(session)
            .await?
            .ok_or(BlueprintError::NoPricing)
    }

    pub async fn export(&self, session: SessionId) -> BlueprintResult<ReportExport> {
        let pricing = self.stored_pricing(session).await?;
        Ok(ReportExport {
            filename: export_filename(&pricing.project_name, Utc::now()),
            body: self.reports.render(&pricing)?,
        })
    }

    pub async fn preview_report(&self, session: SessionId) -> BlueprintResult<PricingPreview> {
        let pricing = self.stored_pricing(session).await?;
        let report = self.reports.render(&pricing)?;
        Ok(PricingPreview {
            pricing: pricing.into(),
            report,
        })
    }

    /// The current catalog (when it has entities) followed by every template
    pub async fn compare(&self, session: SessionId) -> BlueprintResult<Vec<TemplateComparison>> {
        let now = Utc::now();
        let catalog = self.repository.load_catalog(session).await?;
        let mut rows = Vec::new();

        if !catalog.is_empty() {
            let entity_count = catalog.len();
            let pricing = calculate_pricing(catalog.into_entities(), "Váš projekt", "Aktuální", now);
            rows.push(TemplateComparison {
                name: CURRENT_PROJECT_NAME.to_string(),
                description: CURRENT_PROJECT_DESCRIPTION.to_string(),
                industry: None,
                base_price: None,
                entity_count,
                is_current_project: true,
                total_cost: pricing.total_cost(),
                total_hours: pricing.total_hours(),
                formatted_total: pricing.total_cost().formatted(),
            });
        }

        rows.extend(project_templates(now).into_iter().map(|template| {
            let entity_count = template.prebuilt_entities.len();
            let pricing =
                calculate_pricing(template.prebuilt_entities, template.name.clone(), "Template", now);
            TemplateComparison {
                name: template.name,
                description: template.description,
                industry: Some(template.industry),
                base_price: Some(template.base_price),
                entity_count,
                is_current_project: false,
                total_cost: pricing.total_cost(),
                total_hours: pricing.total_hours(),
                formatted_total: pricing.total_cost().formatted(),
            }
        }));

        Ok(rows)
    }

    /// Rough figure for `entity_count` standard Core entities
    pub fn quick_estimate(
        &self,
        request: QuickEstimateRequest,
    ) -> BlueprintResult<QuickEstimateResponse> {
        validate(&request)?;

        let now = Utc::now();
        let entities = (1..=request.entity_count)
            .map(|i| entity_from_template(format!("Entity{}", i), EntityType::Core, now))
            .collect();
        let pricing = calculate_pricing(entities, "Quick Estimate", "Client", now);
        let breakdown = &pricing.breakdown;

        Ok(QuickEstimateResponse {
            total_cost: pricing.total_cost(),
            total_hours: pricing.total_hours(),
            formatted_cost: pricing.total_cost().formatted(),
            breakdown: QuickBreakdown {
                entities: breakdown.entities.cost,
                ui: breakdown.ui.cost,
                security: breakdown.security.cost,
                testing: breakdown.testing.cost,
            },
        })
    }

    pub async fn breakdown(&self, session: SessionId) -> BlueprintResult<BreakdownResponse> {
        let catalog = self.repository.load_catalog(session).await?;
        if catalog.is_empty() {
            return Err(BlueprintError::NothingToPrice);
        }

        let pricing = calculate_pricing(catalog.into_entities(), "", "", Utc::now());
        Ok(BreakdownResponse::from(&pricing.breakdown))
    }

    pub fn rates(&self) -> RateTables {
        RateTables::current()
    }
}

/// Name given to a mockup generated from the catalog
pub const DEFAULT_MOCKUP_NAME: &str = "Nový Projekt";

/// Service layer for mockups and sample data
pub struct MockupService<R: BlueprintRepository> {
    repository: Arc<R>,
    renderer: MockupRenderer,
    rng: SharedRng,
}

impl<R: BlueprintRepository> MockupService<R> {
    pub fn new(repository: Arc<R>, renderer: MockupRenderer, rng: SharedRng) -> Self {
        Self {
            repository,
            renderer,
            rng,
        }
    }

    async fn find_entity(&self, session: SessionId, name: &str) -> BlueprintResult<Entity> {
        self.repository
            .load_catalog(session)
            .await?
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| BlueprintError::EntityNameNotFound(name.to_string()))
    }

    /// Stored mockup project, generated from the catalog on first use
    pub async fn project(&self, session: SessionId) -> BlueprintResult<MockupProject> {
        if let Some(project) = self.repository.load_mockup(session).await? {
            return Ok(project);
        }

        let catalog: EntityCatalog = self.repository.load_catalog(session).await?;
        if catalog.is_empty() {
            return Err(BlueprintError::EmptyCatalog);
        }

        let project = with_generator(&self.rng, |generator| {
            build_mockup_project(DEFAULT_MOCKUP_NAME, catalog.entities(), generator, Utc::now())
        })
        .await;
        self.repository.save_mockup(session, &project).await?;

        info!(
            session_id = %session,
            pages = project.pages.len(),
            "Generated mockup project"
        );
        Ok(project)
    }

    pub async fn page(&self, session: SessionId, page_name: &str) -> BlueprintResult<MockupPage> {
        let project = self
            .repository
            .load_mockup(session)
            .await?
            .ok_or(BlueprintError::NoMockupProject)?;

        project
            .page(page_name)
            .cloned()
            .ok_or_else(|| BlueprintError::PageNotFound(page_name.to_string()))
    }

    pub async fn records(
        &self,
        session: SessionId,
        entity_name: &str,
        count: usize,
    ) -> BlueprintResult<EntityRecords> {
        let entity = self.find_entity(session, entity_name).await?;
        let records = with_generator(&self.rng, |generator| {
            generator.generate_records(&entity, count)
        })
        .await;
        Ok(EntityRecords { entity, records })
    }

    pub async fn form(
        &self,
        session: SessionId,
        entity_name: &str,
        record_id: Option<u64>,
    ) -> BlueprintResult<EntityForm> {
        let entity = self.find_entity(session, entity_name).await?;
        let fields = with_generator(&self.rng, |generator| generator.mock_fields(&entity)).await;
        Ok(EntityForm {
            entity,
            is_edit: record_id.is_some(),
            record_id,
            fields,
        })
    }

    /// One generated record shown under the requested id
    pub async fn detail(
        &self,
        session: SessionId,
        entity_name: &str,
        record_id: u64,
    ) -> BlueprintResult<EntityDetail> {
        let entity = self.find_entity(session, entity_name).await?;
        let mut record = with_generator(&self.rng, |generator| {
            generator.generate_records(&entity, 1)
        })
        .await
        .pop()
        .unwrap_or_default();
        record.insert("Id".to_string(), record_id.to_string());
        Ok(EntityDetail { entity, record })
    }

    pub async fn sample_records(
        &self,
        session: SessionId,
        entity_name: &str,
        count: usize,
    ) -> BlueprintResult<Vec<MockRecord>> {
        Ok(self.records(session, entity_name, count).await?.records)
    }

    pub async fn dashboard(&self, session: SessionId) -> BlueprintResult<DashboardData> {
        let catalog = self.repository.load_catalog(session).await?;
        Ok(with_generator(&self.rng, |generator| {
            generator.dashboard_data(catalog.entities(), Utc::now())
        })
        .await)
    }

    pub async fn update_theme(
        &self,
        session: SessionId,
        theme: MockupTheme,
    ) -> BlueprintResult<MockupTheme> {
        validate(&theme)?;

        let mut project = self
            .repository
            .load_mockup(session)
            .await?
            .ok_or(BlueprintError::NoMockupProject)?;
        project.theme = theme;
        self.repository.save_mockup(session, &project).await?;

        info!(session_id = %session, "Updated mockup theme");
        Ok(project.theme)
    }

    pub async fn generate_component(
        &self,
        session: SessionId,
        request: ComponentRequest,
    ) -> BlueprintResult<ComponentPreview> {
        let entity = self.find_entity(session, &request.entity_name).await?;
        let component = self
            .renderer
            .generate_component(&entity, request.component_type)?;
        Ok(component.into())
    }
}
