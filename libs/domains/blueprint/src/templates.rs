//! Starter templates and demo data.

use chrono::{DateTime, Utc};

use crate::models::{
    Entity, EntityType, ProjectTemplate, Property, PropertyType, Relation, RelationType,
};
use crate::money::Money;
use crate::pricing::refresh_estimates;

/// Entity with the standard property set for its type.
///
/// Every entity gets `Id`, `Name` and `CreatedAt`; Core, Lookup and Complex
/// add their own fields on top.
pub fn entity_from_template(
    name: impl Into<String>,
    entity_type: EntityType,
    now: DateTime<Utc>,
) -> Entity {
    let mut entity = Entity::new(name, entity_type, now)
        .description(format!("Automaticky generovaná entita typu {}", entity_type))
        .property(Property::new("Id", PropertyType::Integer).required())
        .property(
            Property::new("Name", PropertyType::String)
                .required()
                .max_length(100),
        )
        .property(Property::new("CreatedAt", PropertyType::DateTime).required());

    let extra = match entity_type {
        EntityType::Core => vec![
            Property::new("Description", PropertyType::String).max_length(500),
            Property::new("IsActive", PropertyType::Boolean).default_value("true"),
        ],
        EntityType::Lookup => vec![
            Property::new("Code", PropertyType::String)
                .max_length(10)
                .unique(),
            Property::new("SortOrder", PropertyType::Integer).default_value("0"),
        ],
        EntityType::Complex => vec![
            Property::new("Status", PropertyType::String).max_length(50),
            Property::new("Data", PropertyType::Json),
            Property::new("UpdatedAt", PropertyType::DateTime),
        ],
        EntityType::Junction | EntityType::Audit => vec![],
    };
    entity.properties.extend(extra);

    refresh_estimates(&mut entity);
    entity
}

fn template(
    name: &str,
    description: &str,
    industry: &str,
    base_price: i64,
    icon_class: &str,
    entities: &[(&str, EntityType)],
    now: DateTime<Utc>,
) -> ProjectTemplate {
    let prebuilt_entities = entities
        .iter()
        .zip(1..)
        .map(|(&(entity_name, entity_type), id)| {
            let mut entity = entity_from_template(entity_name, entity_type, now);
            entity.id = id;
            entity
        })
        .collect();

    ProjectTemplate {
        name: name.to_string(),
        description: description.to_string(),
        industry: industry.to_string(),
        base_price: Money::euros(base_price),
        icon_class: icon_class.to_string(),
        prebuilt_entities,
    }
}

/// The four built-in project templates.
pub fn project_templates(now: DateTime<Utc>) -> Vec<ProjectTemplate> {
    use EntityType::*;

    vec![
        template(
            "E-commerce",
            "Kompletní e-shop s košíkem a platbami",
            "Retail",
            15_000,
            "fas fa-shopping-cart",
            &[
                ("Product", Core),
                ("Category", Lookup),
                ("Order", Complex),
                ("Customer", Core),
                ("Payment", Complex),
            ],
            now,
        ),
        template(
            "CRM System",
            "Správa zákazníků a obchodních příležitostí",
            "Business",
            12_000,
            "fas fa-users",
            &[
                ("Contact", Core),
                ("Company", Core),
                ("Opportunity", Complex),
                ("Activity", Audit),
            ],
            now,
        ),
        template(
            "Blog Platform",
            "Publikační systém s komentáři",
            "Media",
            8_000,
            "fas fa-blog",
            &[
                ("Article", Core),
                ("Comment", Core),
                ("Tag", Lookup),
                ("Author", Core),
            ],
            now,
        ),
        template(
            "Event Management",
            "Správa událostí a rezervací",
            "Events",
            10_000,
            "fas fa-calendar",
            &[
                ("Event", Core),
                ("Booking", Complex),
                ("Venue", Lookup),
                ("Participant", Core),
            ],
            now,
        ),
    ]
}

/// Template by exact name.
pub fn find_template(name: &str, now: DateTime<Utc>) -> Option<ProjectTemplate> {
    project_templates(now).into_iter().find(|t| t.name == name)
}

/// Demo catalog: User, Product and Order with ids 1..=3.
pub fn sample_entities(now: DateTime<Utc>) -> Vec<Entity> {
    let user = Entity::new("User", EntityType::Core, now)
        .description("Systémový uživatel s přihlašovacími údaji")
        .property(
            Property::new("FirstName", PropertyType::String)
                .required()
                .max_length(100),
        )
        .property(
            Property::new("LastName", PropertyType::String)
                .required()
                .max_length(100),
        )
        .property(
            Property::new("Email", PropertyType::Email)
                .required()
                .unique(),
        )
        .property(Property::new("IsActive", PropertyType::Boolean).default_value("true"));

    let product = Entity::new("Product", EntityType::Core, now)
        .description("Produktový katalog s cenami a skladem")
        .property(
            Property::new("Name", PropertyType::String)
                .required()
                .max_length(200),
        )
        .property(Property::new("Price", PropertyType::Decimal).required())
        .property(Property::new("Stock", PropertyType::Integer).default_value("0"))
        .property(Property::new("IsAvailable", PropertyType::Boolean).default_value("true"))
        .relation(
            Relation::new("Category", "Category", RelationType::OneToMany)
                .additional_cost(Money::euros(300)),
        );

    let order = Entity::new("Order", EntityType::Complex, now)
        .description("Objednávky zákazníků")
        .property(
            Property::new("OrderNumber", PropertyType::String)
                .required()
                .unique(),
        )
        .property(Property::new("OrderDate", PropertyType::DateTime).required())
        .property(Property::new("TotalAmount", PropertyType::Decimal).required())
        .property(Property::new("Status", PropertyType::String).required())
        .relation(
            Relation::new("Customer", "User", RelationType::OneToMany)
                .additional_cost(Money::euros(300)),
        )
        .relation(
            Relation::new("Products", "Product", RelationType::ManyToMany)
                .additional_cost(Money::euros(500)),
        );

    [user, product, order]
        .into_iter()
        .zip(1..)
        .map(|(mut entity, id)| {
            entity.id = id;
            refresh_estimates(&mut entity);
            entity
        })
        .collect()
}
