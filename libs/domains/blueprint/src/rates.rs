//! Fixed rate tables.
//!
//! Every closed enumeration that carries a price implements
//! [`PricedCategory`] with an exhaustive `match`, so a new variant without a
//! rate does not compile.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::mockup_models::ComponentType;
use crate::models::{EntityType, PropertyType, Rate, RelationType, TypeCode};
use crate::money::Money;

pub const HOURLY_RATE: Money = Money::euros(50);

pub const UNIQUE_SURCHARGE: Money = Money::euros(20);
pub const REQUIRED_SURCHARGE: Money = Money::euros(10);

pub const UI_PER_ENTITY: Rate = Rate::euros(950, 19);
pub const SECURITY_BASE: Rate = Rate::euros(400, 8);
pub const ADVANCED_AUTH: Rate = Rate::euros(600, 12);
pub const DEPLOYMENT: Rate = Rate::euros(800, 16);

pub const TESTING_MINIMUM: Money = Money::euros(500);
/// Share of the subtotal covered by testing
pub const TESTING_SHARE_PERCENT: i64 = 20;
/// Rate applied to that share
pub const TESTING_RATE_PERCENT: i64 = 15;
pub const TESTING_HOURS_PERCENT: u32 = 30;

/// A category with a fixed cost and hour rate.
pub trait PricedCategory: Copy {
    fn rate(self) -> Rate;
}

impl PricedCategory for EntityType {
    fn rate(self) -> Rate {
        match self {
            EntityType::Core => Rate::euros(500, 8),
            EntityType::Lookup => Rate::euros(200, 4),
            EntityType::Junction => Rate::euros(300, 6),
            EntityType::Audit => Rate::euros(400, 6),
            EntityType::Complex => Rate::euros(800, 16),
        }
    }
}

/// Unit cost and extra hours per property, before surcharges.
impl PricedCategory for PropertyType {
    fn rate(self) -> Rate {
        match self {
            PropertyType::String => Rate::euros(20, 0),
            PropertyType::Integer => Rate::euros(15, 0),
            PropertyType::Decimal => Rate::euros(15, 0),
            PropertyType::DateTime => Rate::euros(25, 0),
            PropertyType::Boolean => Rate::euros(10, 0),
            PropertyType::Email => Rate::euros(30, 1),
            PropertyType::Phone => Rate::euros(30, 1),
            PropertyType::Url => Rate::euros(25, 0),
            PropertyType::Json => Rate::euros(50, 2),
            PropertyType::File => Rate::euros(80, 3),
        }
    }
}

impl PricedCategory for RelationType {
    fn rate(self) -> Rate {
        match self {
            RelationType::OneToOne => Rate::euros(200, 3),
            RelationType::OneToMany => Rate::euros(300, 4),
            RelationType::ManyToMany => Rate::euros(500, 8),
        }
    }
}

impl PricedCategory for ComponentType {
    fn rate(self) -> Rate {
        match self {
            ComponentType::List => Rate::euros(200, 4),
            ComponentType::Form => Rate::euros(300, 6),
            ComponentType::Detail => Rate::euros(150, 3),
            ComponentType::Dashboard => Rate::euros(500, 10),
            ComponentType::Search => Rate::euros(250, 5),
            ComponentType::Navigation => Rate::euros(100, 2),
            ComponentType::Report => Rate::euros(400, 8),
            ComponentType::Chart => Rate::euros(300, 6),
        }
    }
}

/// One row of a published rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateEntry {
    pub code: u8,
    pub name: String,
    pub cost: Money,
    pub hours: u32,
}

/// Every variant of `T` with its rate, in declaration order.
pub fn rate_table<T: PricedCategory + TypeCode>() -> Vec<RateEntry> {
    T::iter()
        .map(|variant| {
            let rate = variant.rate();
            RateEntry {
                code: variant.code(),
                name: variant.to_string(),
                cost: rate.cost,
                hours: rate.hours,
            }
        })
        .collect()
}

/// Surcharges added on top of a property's unit cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertySurcharges {
    pub unique: Money,
    pub required: Money,
}

/// Testing formula parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestingRates {
    pub minimum: Money,
    pub share_percent: i64,
    pub rate_percent: i64,
    pub hours_percent: u32,
}

/// All pricing constants in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateTables {
    pub hourly_rate: Money,
    pub entity_types: Vec<RateEntry>,
    pub property_types: Vec<RateEntry>,
    pub relation_types: Vec<RateEntry>,
    pub component_types: Vec<RateEntry>,
    pub property_surcharges: PropertySurcharges,
    pub ui_per_entity: Rate,
    pub security_base: Rate,
    pub advanced_auth: Rate,
    pub testing: TestingRates,
    pub deployment: Rate,
}

impl RateTables {
    pub fn current() -> Self {
        Self {
            hourly_rate: HOURLY_RATE,
            entity_types: rate_table::<EntityType>(),
            property_types: rate_table::<PropertyType>(),
            relation_types: rate_table::<RelationType>(),
            component_types: rate_table::<ComponentType>(),
            property_surcharges: PropertySurcharges {
                unique: UNIQUE_SURCHARGE,
                required: REQUIRED_SURCHARGE,
            },
            ui_per_entity: UI_PER_ENTITY,
            security_base: SECURITY_BASE,
            advanced_auth: ADVANCED_AUTH,
            testing: TestingRates {
                minimum: TESTING_MINIMUM,
                share_percent: TESTING_SHARE_PERCENT,
                rate_percent: TESTING_RATE_PERCENT,
                hours_percent: TESTING_HOURS_PERCENT,
            },
            deployment: DEPLOYMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_rates() {
        assert_eq!(EntityType::Core.rate(), Rate::euros(500, 8));
        assert_eq!(EntityType::Complex.rate(), Rate::euros(800, 16));
    }

    #[test]
    fn test_property_rates_carry_extra_hours_only_for_special_types() {
        let with_hours: Vec<PropertyType> = PropertyType::iter()
            .filter(|t| t.rate().hours > 0)
            .collect();
        assert_eq!(
            with_hours,
            vec![
                PropertyType::Email,
                PropertyType::Phone,
                PropertyType::Json,
                PropertyType::File
            ]
        );
    }

    #[test]
    fn test_rate_table_covers_every_variant() {
        let table = rate_table::<ComponentType>();
        assert_eq!(table.len(), 8);
        assert_eq!(table[3].name, "Dashboard");
        assert_eq!(table[3].cost, Money::euros(500));
        assert_eq!(table[3].hours, 10);
        assert!(table.iter().all(|row| row.code >= 1));
    }

    #[test]
    fn test_rate_tables_document() {
        let tables = RateTables::current();
        assert_eq!(tables.hourly_rate, Money::euros(50));
        assert_eq!(tables.relation_types.len(), 3);
        assert_eq!(tables.property_types.len(), 10);
        assert_eq!(tables.testing.minimum, Money::euros(500));
    }
}
