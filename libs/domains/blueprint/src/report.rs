//! Markdown price quote.

use chrono::{DateTime, Duration, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{BlueprintError, BlueprintResult};
use crate::models::{PricingModel, Rate};
use crate::pricing::estimate_entity_cost;

const REPORT_TEMPLATE_NAME: &str = "pricing_report";

/// How long a quote stays valid.
pub const OFFER_VALIDITY_DAYS: i64 = 30;

const REPORT_TEMPLATE: &str = r#"# Cenová nabídka - {{project_name}}

**Klient:** {{client_name}}  
**Datum:** {{date}}  
**Celková cena:** {{total_cost}} EUR  
**Odhadované hodiny:** {{total_hours}}h  

## Rozpis nákladů

### Datové entity ({{entity_count}}x)
- **Náklady:** {{entities.cost}} EUR
- **Hodiny:** {{entities.hours}}h

### Relace mezi entitami
- **Náklady:** {{relations.cost}} EUR
- **Hodiny:** {{relations.hours}}h

### Uživatelské rozhraní
- **Náklady:** {{ui.cost}} EUR
- **Hodiny:** {{ui.hours}}h

### Bezpečnost a autentizace
- **Náklady:** {{security.cost}} EUR
- **Hodiny:** {{security.hours}}h

### Testování
- **Náklady:** {{testing.cost}} EUR
- **Hodiny:** {{testing.hours}}h

### Nasazení a deployment
- **Náklady:** {{deployment.cost}} EUR
- **Hodiny:** {{deployment.hours}}h

## Detailní rozpis entit
{{#each details}}

### {{name}} ({{entity_type}})
- **Popis:** {{description}}
- **Vlastnosti:** {{property_count}}x
- **Relace:** {{relation_count}}x
- **Náklady:** {{cost}} EUR
{{/each}}

## Podmínky
- Ceny jsou uvedeny v EUR bez DPH
- Odhad času je orientační a může se lišit podle složitosti požadavků
- Zahrnuje základní funkcionalitu bez specifických integrací
- Finální cena může být upravena po detailní analýze požadavků

**Kontakt:** info@optimalyblueprint.com  
**Platnost nabídky:** {{valid_until}}
"#;

#[derive(Serialize)]
struct SectionView {
    cost: String,
    hours: u32,
}

impl From<Rate> for SectionView {
    fn from(rate: Rate) -> Self {
        Self {
            cost: rate.cost.amount_display(),
            hours: rate.hours,
        }
    }
}

#[derive(Serialize)]
struct EntityDetailView<'a> {
    name: &'a str,
    entity_type: String,
    description: &'a str,
    property_count: usize,
    relation_count: usize,
    cost: String,
}

#[derive(Serialize)]
struct ReportView<'a> {
    project_name: &'a str,
    client_name: &'a str,
    date: String,
    valid_until: String,
    total_cost: String,
    total_hours: u32,
    entity_count: usize,
    entities: SectionView,
    relations: SectionView,
    ui: SectionView,
    security: SectionView,
    testing: SectionView,
    deployment: SectionView,
    details: Vec<EntityDetailView<'a>>,
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d.%m.%Y").to_string()
}

impl<'a> ReportView<'a> {
    fn new(pricing: &'a PricingModel) -> Self {
        let breakdown = &pricing.breakdown;
        let total = breakdown.total();

        Self {
            project_name: &pricing.project_name,
            client_name: &pricing.client_name,
            date: format_date(pricing.created_at),
            valid_until: format_date(pricing.created_at + Duration::days(OFFER_VALIDITY_DAYS)),
            total_cost: total.cost.amount_display(),
            total_hours: total.hours,
            entity_count: pricing.entities.len(),
            entities: breakdown.entities.into(),
            relations: breakdown.relations.into(),
            ui: breakdown.ui.into(),
            security: breakdown.security.into(),
            testing: breakdown.testing.into(),
            deployment: breakdown.deployment.into(),
            details: pricing
                .entities
                .iter()
                .map(|entity| EntityDetailView {
                    name: &entity.name,
                    entity_type: entity.entity_type.to_string(),
                    description: &entity.description,
                    property_count: entity.properties.len(),
                    relation_count: entity.relations.len(),
                    cost: estimate_entity_cost(entity).amount_display(),
                })
                .collect(),
        }
    }
}

/// Renders [`PricingModel`]s as Czech markdown quotes.
///
/// The per-entity section shows [`estimate_entity_cost`], which leaves out
/// UI, security, testing and deployment and so does not add up to the total.
#[derive(Clone)]
pub struct ReportRenderer {
    handlebars: Arc<Handlebars<'static>>,
}

impl ReportRenderer {
    pub fn new() -> BlueprintResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
            .map_err(|e| BlueprintError::Render(e.to_string()))?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    pub fn render(&self, pricing: &PricingModel) -> BlueprintResult<String> {
        self.handlebars
            .render(REPORT_TEMPLATE_NAME, &ReportView::new(pricing))
            .map_err(|e| BlueprintError::Render(e.to_string()))
    }
}

/// `Cenova_nabidka_<project>_<yyyyMMdd>.md`
pub fn export_filename(project_name: &str, date: DateTime<Utc>) -> String {
    format!("Cenova_nabidka_{}_{}.md", project_name, date.format("%Y%m%d"))
}
