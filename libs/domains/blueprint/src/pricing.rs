//! Pricing engine.
//!
//! Pure functions over an entity list. Every figure comes from the fixed
//! tables in [`crate::rates`]; nothing here touches the session.

use chrono::{DateTime, Utc};

use crate::models::{CostItem, Entity, PricingBreakdown, PricingModel, Property, PropertyType, Rate};
use crate::money::{Currency, Money};
use crate::rates::{
    ADVANCED_AUTH, DEPLOYMENT, PricedCategory, REQUIRED_SURCHARGE, SECURITY_BASE,
    TESTING_HOURS_PERCENT, TESTING_MINIMUM, TESTING_RATE_PERCENT, TESTING_SHARE_PERCENT,
    UI_PER_ENTITY, UNIQUE_SURCHARGE,
};

const ACCOUNT_MARKERS: [&str; 2] = ["user", "account"];

/// Cost of one property: unit cost plus the unique/required surcharges.
pub fn property_cost(property: &Property) -> Money {
    let mut cost = property.property_type.rate().cost;
    if property.is_unique {
        cost += UNIQUE_SURCHARGE;
    }
    if property.is_required {
        cost += REQUIRED_SURCHARGE;
    }
    cost
}

/// Cost and extra hours of a property list.
pub fn properties_rate(properties: &[Property]) -> Rate {
    properties
        .iter()
        .map(|p| Rate::new(property_cost(p), p.property_type.rate().hours))
        .sum()
}

/// Cost and hours of an entity's relations.
pub fn relations_rate(entity: &Entity) -> Rate {
    entity
        .relations
        .iter()
        .map(|r| r.relation_type.rate())
        .sum()
}

/// Base plus properties; the figure that lands in the Entity line item.
fn entity_line_rate(entity: &Entity) -> Rate {
    entity.entity_type.rate() + properties_rate(&entity.properties)
}

/// Base, property and relation cost of a single entity.
///
/// This is the per-entity figure shown in the report. It is smaller than the
/// entity's share of a full breakdown, which also carries UI, security,
/// testing and deployment.
pub fn estimate_entity_cost(entity: &Entity) -> Money {
    (entity_line_rate(entity) + relations_rate(entity)).cost
}

/// Base, property and relation hours of a single entity.
pub fn estimate_entity_hours(entity: &Entity) -> u32 {
    (entity_line_rate(entity) + relations_rate(entity)).hours
}

/// Store the current estimates on the entity.
pub fn refresh_estimates(entity: &mut Entity) {
    entity.estimated_cost = estimate_entity_cost(entity);
    entity.development_hours = estimate_entity_hours(entity);
}

fn is_account_entity(entity: &Entity) -> bool {
    let name = entity.name.to_lowercase();
    ACCOUNT_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Itemized cost of an entity set.
///
/// Deterministic: the same list always yields the same breakdown.
pub fn compute_breakdown(entities: &[Entity]) -> PricingBreakdown {
    let mut breakdown = PricingBreakdown::default();

    for entity in entities {
        let line = entity_line_rate(entity);
        breakdown.entities += line;
        breakdown.relations += relations_rate(entity);

        breakdown.detailed_items.push(CostItem::new(
            "Entity",
            format!("{} ({})", entity.name, entity.entity_type),
            1,
            line.cost,
            line.hours,
            format!("{} properties", entity.properties.len()),
        ));
    }

    breakdown.ui = UI_PER_ENTITY.times(entities.len() as u32);

    let account_entities = entities.iter().any(is_account_entity);
    let email_properties = entities
        .iter()
        .any(|e| e.has_property_of_type(PropertyType::Email));

    breakdown.security = SECURITY_BASE;
    if account_entities || email_properties {
        breakdown.security.cost += ADVANCED_AUTH.cost;
    }
    if account_entities {
        breakdown.security.hours += ADVANCED_AUTH.hours;
    }

    let subtotal = breakdown.entities + breakdown.relations + breakdown.ui + breakdown.security;
    let testing_cost = subtotal
        .cost
        .percent(TESTING_SHARE_PERCENT)
        .percent(TESTING_RATE_PERCENT);
    breakdown.testing = Rate::new(
        testing_cost.max(TESTING_MINIMUM),
        subtotal.hours * TESTING_HOURS_PERCENT / 100,
    );

    breakdown.deployment = DEPLOYMENT;

    breakdown
}

/// Price an entity list as a named quote.
pub fn calculate_pricing(
    entities: Vec<Entity>,
    project_name: impl Into<String>,
    client_name: impl Into<String>,
    now: DateTime<Utc>,
) -> PricingModel {
    let breakdown = compute_breakdown(&entities);
    PricingModel {
        project_name: project_name.into(),
        client_name: client_name.into(),
        created_at: now,
        entities,
        breakdown,
        currency: Currency::Eur,
    }
}
