use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, AddAssign};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::money::{Currency, Money};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("Název nesmí být prázdný.")));
    }
    Ok(())
}

fn validate_property_list(properties: &[Property]) -> Result<(), ValidationError> {
    if properties.iter().any(|p| p.validate().is_err()) {
        return Err(ValidationError::new("invalid_property")
            .with_message(Cow::Borrowed("Neplatná vlastnost entity.")));
    }
    Ok(())
}

fn validate_relation_list(relations: &[Relation]) -> Result<(), ValidationError> {
    if relations.iter().any(|r| r.validate().is_err()) {
        return Err(ValidationError::new("invalid_relation")
            .with_message(Cow::Borrowed("Neplatná relace entity.")));
    }
    Ok(())
}

/// Numeric code and display name used by the type pickers.
pub trait TypeCode: IntoEnumIterator + fmt::Display + Copy {
    /// Stable 1-based code.
    fn code(self) -> u8;
}

/// `{value, text}` pair for a type picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TypeOption {
    pub value: u8,
    pub text: String,
}

/// All variants of `T` as picker options, in declaration order.
pub fn type_options<T: TypeCode>() -> Vec<TypeOption> {
    T::iter()
        .map(|variant| TypeOption {
            value: variant.code(),
            text: variant.to_string(),
        })
        .collect()
}

/// Kind of entity being priced
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum EntityType {
    /// Business entity with full CRUD
    #[default]
    Core = 1,
    /// Code/value list
    Lookup = 2,
    /// Join table for many-to-many relations
    Junction = 3,
    /// Change history
    Audit = 4,
    /// Entity with workflow or structured payload
    Complex = 5,
}

/// Data type of an entity property
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PropertyType {
    #[default]
    String = 1,
    Integer = 2,
    Decimal = 3,
    DateTime = 4,
    Boolean = 5,
    Email = 6,
    Phone = 7,
    Url = 8,
    Json = 9,
    File = 10,
}

/// Cardinality of a relation
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum RelationType {
    OneToOne = 1,
    #[default]
    OneToMany = 2,
    ManyToMany = 3,
}

impl TypeCode for EntityType {
    fn code(self) -> u8 {
        self as u8
    }
}

impl TypeCode for PropertyType {
    fn code(self) -> u8 {
        self as u8
    }
}

impl TypeCode for RelationType {
    fn code(self) -> u8 {
        self as u8
    }
}

/// Single field of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Property {
    #[validate(
        length(min = 1, max = 100, message = "Název vlastnosti je povinný."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            is_required: false,
            is_unique: false,
            max_length: None,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Link from one entity to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Relation {
    #[validate(
        length(min = 1, max = 100, message = "Název relace je povinný."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<u64>,
    #[serde(default)]
    pub related_entity_name: String,
    #[serde(rename = "type", default)]
    pub relation_type: RelationType,
    /// Informational only; pricing uses the relation rate table.
    #[serde(default)]
    pub additional_cost: Money,
}

impl Relation {
    pub fn new(
        name: impl Into<String>,
        related_entity_name: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            name: name.into(),
            related_entity_id: None,
            related_entity_name: related_entity_name.into(),
            relation_type,
            additional_cost: Money::zero(),
        }
    }

    pub fn additional_cost(mut self, cost: Money) -> Self {
        self.additional_cost = cost;
        self
    }
}

/// Blueprint entity, the unit being priced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Entity {
    /// Session-scoped identifier, assigned by the catalog
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    pub created_at: DateTime<Utc>,
    /// Cached `estimate_entity_cost`
    #[serde(default)]
    pub estimated_cost: Money,
    /// Cached `estimate_entity_hours`
    #[serde(default)]
    pub development_hours: u32,
}

impl Entity {
    /// Unsaved entity; the catalog assigns the id on insert.
    pub fn new(
        name: impl Into<String>,
        entity_type: EntityType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            entity_type,
            properties: Vec::new(),
            relations: Vec::new(),
            created_at,
            estimated_cost: Money::zero(),
            development_hours: 0,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Apply a partial update. The id and creation time never change.
    pub fn apply_update(&mut self, update: UpdateEntity) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(entity_type) = update.entity_type {
            self.entity_type = entity_type;
        }
        if let Some(properties) = update.properties {
            self.properties = properties;
        }
        if let Some(relations) = update.relations {
            self.relations = relations;
        }
    }

    pub fn has_property_of_type(&self, property_type: PropertyType) -> bool {
        self.properties
            .iter()
            .any(|p| p.property_type == property_type)
    }

    /// Lowercased name, as used in routes and placeholders.
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }
}

/// DTO for creating an entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateEntity {
    #[validate(
        length(min = 1, max = 100, message = "Název entity je povinný."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,
    #[serde(default)]
    #[validate(nested)]
    pub properties: Vec<Property>,
    #[serde(default)]
    #[validate(nested)]
    pub relations: Vec<Relation>,
}

impl CreateEntity {
    pub fn into_entity(self, created_at: DateTime<Utc>) -> Entity {
        Entity {
            id: 0,
            name: self.name.trim().to_string(),
            description: self.description,
            entity_type: self.entity_type,
            properties: self.properties,
            relations: self.relations,
            created_at,
            estimated_cost: Money::zero(),
            development_hours: 0,
        }
    }
}

/// DTO for updating an entity; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateEntity {
    #[validate(
        length(min = 1, max = 100, message = "Název entity je povinný."),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
    #[validate(custom(function = "validate_property_list"))]
    pub properties: Option<Vec<Property>>,
    #[validate(custom(function = "validate_relation_list"))]
    pub relations: Option<Vec<Relation>>,
}

/// DTO for the one-field quick add form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuickAddEntity {
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_type: EntityType,
}

/// DTO for replacing the catalog with a template
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoadTemplate {
    pub template_name: String,
}

/// Cost and hours of a single estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimateResponse {
    pub cost: Money,
    pub formatted: String,
    pub hours: u32,
}

fn default_mock_count() -> usize {
    5
}

/// Query for sample values of one property type
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
pub struct MockDataQuery {
    pub property_type: PropertyType,
    #[serde(default = "default_mock_count")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 5, minimum = 1, maximum = 100)]
    pub count: usize,
}

fn first_id() -> u64 {
    1
}

/// Entities of one session, with the id counter.
///
/// Ids are assigned on insert from a counter that only moves forward, so
/// deleting an entity never frees its id for reuse. Replacing the whole
/// catalog (template load) renumbers from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityCatalog {
    #[serde(default)]
    entities: Vec<Entity>,
    #[serde(default = "first_id")]
    next_id: u64,
}

impl Default for EntityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: first_id(),
        }
    }

    /// Catalog holding `entities`, renumbered `1..=n`.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut catalog = Self::new();
        catalog.replace_all(entities);
        catalog
    }

    /// Repair a catalog read back from storage: zero or duplicate ids get
    /// fresh ones and the counter moves past the largest id.
    pub fn normalized(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut next = self
            .entities
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            .max(self.next_id.saturating_sub(1))
            + 1;

        for entity in &mut self.entities {
            if entity.id == 0 || !seen.insert(entity.id) {
                entity.id = next;
                seen.insert(next);
                next += 1;
            }
        }
        self.next_id = next;
        self
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        let wanted = name.to_lowercase();
        self.entities
            .iter()
            .find(|e| e.name.to_lowercase() == wanted)
    }

    /// Assign the next id and append. Returns the stored entity.
    pub fn insert(&mut self, mut entity: Entity) -> &Entity {
        entity.id = self.next_id;
        self.next_id += 1;
        let index = self.entities.len();
        self.entities.push(entity);
        &self.entities[index]
    }

    pub fn remove(&mut self, id: u64) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Drop every entity. The counter keeps running.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Replace everything and renumber `1..=n`.
    pub fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities = entities
            .into_iter()
            .zip(1..)
            .map(|(mut entity, id)| {
                entity.id = id;
                entity
            })
            .collect();
        self.next_id = self.entities.len() as u64 + 1;
    }
}

/// Cost and hours pair, used both for rate table entries and breakdown
/// categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Rate {
    pub cost: Money,
    pub hours: u32,
}

impl Rate {
    pub const ZERO: Rate = Rate::new(Money::zero(), 0);

    pub const fn new(cost: Money, hours: u32) -> Self {
        Self { cost, hours }
    }

    /// Whole-euro rate.
    pub const fn euros(cost: i64, hours: u32) -> Self {
        Self::new(Money::euros(cost), hours)
    }

    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.cost.times(quantity), self.hours * quantity)
    }
}

impl Add for Rate {
    type Output = Rate;

    fn add(self, rhs: Rate) -> Rate {
        Rate::new(self.cost + rhs.cost, self.hours + rhs.hours)
    }
}

impl AddAssign for Rate {
    fn add_assign(&mut self, rhs: Rate) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Rate {
    fn sum<I: Iterator<Item = Rate>>(iter: I) -> Rate {
        iter.fold(Rate::ZERO, Add::add)
    }
}

/// One line of the itemized breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostItem {
    pub category: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// Always `quantity × unit_price`
    pub total_price: Money,
    pub hours: u32,
    #[serde(default)]
    pub notes: String,
}

impl CostItem {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        hours: u32,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            quantity,
            unit_price,
            total_price: unit_price.times(quantity),
            hours,
            notes: notes.into(),
        }
    }
}

/// Itemized cost of an entity set, by category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct PricingBreakdown {
    pub entities: Rate,
    pub relations: Rate,
    pub ui: Rate,
    pub security: Rate,
    /// Reserved, always zero
    pub integrations: Rate,
    pub testing: Rate,
    pub deployment: Rate,
    pub detailed_items: Vec<CostItem>,
}

impl PricingBreakdown {
    /// The seven categories in report order, keyed by their JSON name.
    pub fn categories(&self) -> [(&'static str, Rate); 7] {
        [
            ("entities", self.entities),
            ("relations", self.relations),
            ("ui", self.ui),
            ("security", self.security),
            ("integrations", self.integrations),
            ("testing", self.testing),
            ("deployment", self.deployment),
        ]
    }

    pub fn total(&self) -> Rate {
        self.categories().into_iter().map(|(_, rate)| rate).sum()
    }

    pub fn total_cost(&self) -> Money {
        self.total().cost
    }

    pub fn total_hours(&self) -> u32 {
        self.total().hours
    }
}

/// Priced snapshot of a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricingModel {
    pub project_name: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub entities: Vec<Entity>,
    pub breakdown: PricingBreakdown,
    #[serde(default)]
    pub currency: Currency,
}

impl PricingModel {
    pub fn total_cost(&self) -> Money {
        self.breakdown.total_cost()
    }

    pub fn total_hours(&self) -> u32 {
        self.breakdown.total_hours()
    }
}

/// Pricing model plus derived totals, as returned over HTTP
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingSummary {
    #[serde(flatten)]
    pub pricing: PricingModel,
    pub total_cost: Money,
    pub total_hours: u32,
    pub formatted_total: String,
}

impl From<PricingModel> for PricingSummary {
    fn from(pricing: PricingModel) -> Self {
        let total = pricing.breakdown.total();
        Self {
            pricing,
            total_cost: total.cost,
            total_hours: total.hours,
            formatted_total: total.cost.formatted(),
        }
    }
}

fn default_project_name() -> String {
    "Nový Projekt".to_string()
}

fn default_client_name() -> String {
    "Klient".to_string()
}

/// Project and client labels for a quote
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PricingRequest {
    #[serde(default = "default_project_name")]
    #[validate(length(min = 1, max = 200))]
    #[param(default = "Nový Projekt")]
    pub project_name: String,
    #[serde(default = "default_client_name")]
    #[validate(length(min = 1, max = 200))]
    #[param(default = "Klient")]
    pub client_name: String,
}

impl Default for PricingRequest {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            client_name: default_client_name(),
        }
    }
}

/// Stored pricing plus its rendered markdown report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingPreview {
    pub pricing: PricingSummary,
    pub report: String,
}

/// Named starter bundle of entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectTemplate {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub base_price: Money,
    pub icon_class: String,
    pub prebuilt_entities: Vec<Entity>,
}

/// One row of the template comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateComparison {
    pub name: String,
    pub description: String,
    pub industry: Option<String>,
    pub base_price: Option<Money>,
    pub entity_count: usize,
    pub is_current_project: bool,
    pub total_cost: Money,
    pub total_hours: u32,
    pub formatted_total: String,
}

/// Request for a rough estimate of `entity_count` plain entities
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct QuickEstimateRequest {
    #[validate(range(min = 1, max = 100, message = "Počet entit musí být mezi 1 a 100."))]
    pub entity_count: u32,
}

/// Subset of categories shown by the quick estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuickBreakdown {
    pub entities: Money,
    pub ui: Money,
    pub security: Money,
    pub testing: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuickEstimateResponse {
    pub total_cost: Money,
    pub total_hours: u32,
    pub formatted_cost: String,
    pub breakdown: QuickBreakdown,
}

/// Category costs, totals and line items of the current catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreakdownResponse {
    pub entities: Money,
    pub relations: Money,
    pub ui: Money,
    pub security: Money,
    pub testing: Money,
    pub deployment: Money,
    pub total: Money,
    pub total_hours: u32,
    pub items: Vec<CostItem>,
}

impl From<&PricingBreakdown> for BreakdownResponse {
    fn from(breakdown: &PricingBreakdown) -> Self {
        Self {
            entities: breakdown.entities.cost,
            relations: breakdown.relations.cost,
            ui: breakdown.ui.cost,
            security: breakdown.security.cost,
            testing: breakdown.testing.cost,
            deployment: breakdown.deployment.cost,
            total: breakdown.total_cost(),
            total_hours: breakdown.total_hours(),
            items: breakdown.detailed_items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entity(name: &str) -> Entity {
        Entity::new(name, EntityType::Core, Utc::now())
    }

    #[test]
    fn test_type_options_are_one_based_and_pascal_case() {
        let options = type_options::<EntityType>();
        assert_eq!(options.len(), 5);
        assert_eq!(
            options[0],
            TypeOption {
                value: 1,
                text: "Core".to_string()
            }
        );
        assert_eq!(options[4].text, "Complex");

        let relations = type_options::<RelationType>();
        assert_eq!(relations[2].value, 3);
        assert_eq!(relations[2].text, "ManyToMany");
        assert_eq!(type_options::<PropertyType>().len(), 10);
    }

    #[test]
    fn test_enum_serde_names() {
        assert_eq!(serde_json::to_value(EntityType::Core).unwrap(), "core");
        assert_eq!(serde_json::to_value(PropertyType::DateTime).unwrap(), "datetime");
        assert_eq!(
            serde_json::to_value(RelationType::ManyToMany).unwrap(),
            "many_to_many"
        );
        assert_eq!(PropertyType::from_str("datetime").unwrap(), PropertyType::DateTime);
        assert_eq!(EntityType::from_str("complex").unwrap(), EntityType::Complex);
    }

    #[test]
    fn test_catalog_assigns_monotonic_ids() {
        let mut catalog = EntityCatalog::new();
        let first = catalog.insert(entity("A")).id;
        let second = catalog.insert(entity("B")).id;
        assert_eq!((first, second), (1, 2));

        catalog.remove(second);
        let third = catalog.insert(entity("C")).id;
        assert_eq!(third, 3);

        catalog.clear();
        assert!(catalog.is_empty());
        assert_eq!(catalog.insert(entity("D")).id, 4);
    }

    #[test]
    fn test_catalog_replace_renumbers() {
        let mut catalog = EntityCatalog::new();
        for _ in 0..5 {
            catalog.insert(entity("Old"));
        }

        catalog.replace_all(vec![entity("X"), entity("Y")]);
        let ids: Vec<u64> = catalog.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.next_id(), 3);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let catalog = EntityCatalog::from_entities(vec![entity("Product"), entity("Účet")]);
        assert_eq!(catalog.find_by_name("product").map(|e| e.id), Some(1));
        assert_eq!(catalog.find_by_name("ÚČET").map(|e| e.id), Some(2));
        assert!(catalog.find_by_name("Order").is_none());
    }

    #[test]
    fn test_normalized_repairs_ids_and_counter() {
        let mut a = entity("A");
        a.id = 7;
        let mut b = entity("B");
        b.id = 7;
        let c = entity("C");

        let raw = serde_json::json!({ "entities": [a, b, c] });
        let catalog: EntityCatalog = serde_json::from_value(raw).unwrap();
        let catalog = catalog.normalized();

        let ids: Vec<u64> = catalog.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
        assert_eq!(catalog.next_id(), 10);
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let mut catalog = EntityCatalog::new();
        catalog.insert(
            entity("Customer")
                .property(Property::new("Email", PropertyType::Email).required().unique()),
        );

        let json = serde_json::to_string(&catalog).unwrap();
        let decoded: EntityCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, catalog);
        assert!(decoded.entities().iter().all(|e| e.id >= 1));
    }

    #[test]
    fn test_apply_update_keeps_identity() {
        let mut catalog = EntityCatalog::new();
        let id = catalog.insert(entity("Draft")).id;
        let stored = catalog.get_mut(id).unwrap();
        let created_at = stored.created_at;

        stored.apply_update(UpdateEntity {
            name: Some("  Invoice ".to_string()),
            entity_type: Some(EntityType::Complex),
            ..Default::default()
        });

        assert_eq!(stored.id, id);
        assert_eq!(stored.name, "Invoice");
        assert_eq!(stored.entity_type, EntityType::Complex);
        assert_eq!(stored.created_at, created_at);
    }

    #[test]
    fn test_create_entity_rejects_blank_name() {
        let input = CreateEntity {
            name: "   ".to_string(),
            description: String::new(),
            entity_type: EntityType::Core,
            properties: vec![],
            relations: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_entity_validates_nested_properties() {
        let input: CreateEntity = serde_json::from_value(serde_json::json!({
            "name": "Order",
            "properties": [{ "name": "", "type": "string" }]
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_entity_validates_property_list() {
        let update = UpdateEntity {
            properties: Some(vec![Property::new("", PropertyType::String)]),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateEntity {
            properties: Some(vec![Property::new("Title", PropertyType::String)]),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_cost_item_total_is_quantity_times_unit() {
        let item = CostItem::new("Entity", "Order (Complex)", 3, Money::euros(120), 4, "");
        assert_eq!(item.total_price, Money::euros(360));
    }

    #[test]
    fn test_pricing_request_defaults() {
        let request: PricingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.project_name, "Nový Projekt");
        assert_eq!(request.client_name, "Klient");
    }
}
