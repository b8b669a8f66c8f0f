//! Mockup project and component generation.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{BlueprintError, BlueprintResult};
use crate::mock_data::MockDataGenerator;
use crate::mockup_models::{
    ComponentType, MockupComponent, MockupPage, MockupProject, MockupTheme, PageType,
};
use crate::models::Entity;
use crate::rates::PricedCategory;

const LIST_COLUMNS: usize = 4;
const FORM_FIELDS: usize = 6;
const DETAIL_ROWS: usize = 6;

fn component(
    name: impl Into<String>,
    component_type: ComponentType,
    entity_name: Option<&str>,
) -> MockupComponent {
    let rate = component_type.rate();
    MockupComponent {
        name: name.into(),
        component_type,
        entity_name: entity_name.map(str::to_string),
        fields: Vec::new(),
        preview_html: String::new(),
        development_cost: rate.cost,
        development_hours: rate.hours,
    }
}

fn entity_pages(entity: &Entity) -> [MockupPage; 2] {
    let slug = entity.slug();
    [
        MockupPage {
            name: format!("{} List", entity.name),
            route: format!("/{}", slug),
            page_type: PageType::List,
            description: format!("Seznam všech {}", entity.name),
            components: vec![component(
                format!("{} Table", entity.name),
                ComponentType::List,
                Some(entity.name.as_str()),
            )],
        },
        MockupPage {
            name: format!("Create {}", entity.name),
            route: format!("/{}/create", slug),
            page_type: PageType::Create,
            description: format!("Vytvoření nového {}", entity.name),
            components: vec![component(
                format!("{} Form", entity.name),
                ComponentType::Form,
                Some(entity.name.as_str()),
            )],
        },
    ]
}

/// Page tree for `entities`: the dashboard, then a list and a create page
/// per entity.
pub fn build_mockup_project<R: Rng>(
    name: &str,
    entities: &[Entity],
    generator: &mut MockDataGenerator<R>,
    now: DateTime<Utc>,
) -> MockupProject {
    let dashboard = MockupPage {
        name: "Dashboard".to_string(),
        route: "/".to_string(),
        page_type: PageType::Dashboard,
        description: "Hlavní přehledová stránka".to_string(),
        components: vec![component(
            "Statistics Overview",
            ComponentType::Dashboard,
            None,
        )],
    };

    let pages = std::iter::once(dashboard)
        .chain(entities.iter().flat_map(entity_pages))
        .collect();

    MockupProject {
        name: name.to_string(),
        description: format!("Automaticky generovaný mockup pro projekt {}", name),
        client_name: generator.random_company().to_string(),
        created_at: now,
        pages,
        theme: MockupTheme {
            primary_color: generator.random_color().to_string(),
            company_name: name.to_string(),
            ..MockupTheme::default()
        },
    }
}

const LIST_TEMPLATE: &str = r#"<div class='table-responsive'>
    <table class='table table-striped'>
        <thead>
            <tr>
                <th>ID</th>
{{#each columns}}                <th>{{this}}</th>
{{/each}}                <th>Akce</th>
            </tr>
        </thead>
        <tbody>
            <tr>
                <td>1</td>
{{#each columns}}                <td>Sample data</td>
{{/each}}                <td>
                    <button class='btn btn-sm btn-primary'>Edit</button>
                    <button class='btn btn-sm btn-danger'>Delete</button>
                </td>
            </tr>
        </tbody>
    </table>
</div>"#;

const FORM_TEMPLATE: &str = r#"<form>
{{#each fields}}    <div class='mb-3'>
        <label class='form-label'>{{name}}</label>
        <input type='text' class='form-control' placeholder='{{name}}'{{#if required}} required{{/if}} />
    </div>
{{/each}}    <button type='submit' class='btn btn-primary'>Uložit</button>
    <button type='button' class='btn btn-secondary'>Zrušit</button>
</form>"#;

const DETAIL_TEMPLATE: &str = r#"<div class='card'>
    <div class='card-header'>
        <h5>{{title}} Detail</h5>
    </div>
    <div class='card-body'>
{{#each fields}}        <div class='row mb-2'>
            <div class='col-sm-3'><strong>{{name}}:</strong></div>
            <div class='col-sm-9'>Sample {{lower}} value</div>
        </div>
{{/each}}    </div>
</div>"#;

const DASHBOARD_TEMPLATE: &str = r#"<div class='row'>
    <div class='col-md-3'>
        <div class='card text-center'>
            <div class='card-body'>
                <h3>125</h3>
                <p>Total {{title}}s</p>
            </div>
        </div>
    </div>
    <div class='col-md-9'>
        <canvas id='chart-{{lower}}'></canvas>
    </div>
</div>"#;

const PLACEHOLDER_TEMPLATE: &str =
    "<div class='component-placeholder'>{{component_type}} component for {{title}}</div>";

#[derive(Serialize)]
struct FieldView<'a> {
    name: &'a str,
    lower: String,
    required: bool,
}

#[derive(Serialize)]
struct ComponentView<'a> {
    title: &'a str,
    lower: String,
    component_type: String,
    columns: Vec<&'a str>,
    fields: Vec<FieldView<'a>>,
}

impl<'a> ComponentView<'a> {
    fn new(entity: &'a Entity, component_type: ComponentType) -> Self {
        let limit = match component_type {
            ComponentType::Form => FORM_FIELDS,
            _ => DETAIL_ROWS,
        };

        Self {
            title: &entity.name,
            lower: entity.slug(),
            component_type: component_type.to_string(),
            columns: entity
                .properties
                .iter()
                .take(LIST_COLUMNS)
                .map(|p| p.name.as_str())
                .collect(),
            fields: entity
                .properties
                .iter()
                .take(limit)
                .map(|p| FieldView {
                    name: &p.name,
                    lower: p.name.to_lowercase(),
                    required: p.is_required,
                })
                .collect(),
        }
    }
}

fn template_name(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::List => "list",
        ComponentType::Form => "form",
        ComponentType::Detail => "detail",
        ComponentType::Dashboard => "dashboard",
        ComponentType::Search
        | ComponentType::Navigation
        | ComponentType::Report
        | ComponentType::Chart => "placeholder",
    }
}

/// Renders HTML previews of generated components.
///
/// Entity and property names are HTML-escaped.
#[derive(Clone)]
pub struct MockupRenderer {
    handlebars: Arc<Handlebars<'static>>,
}

impl MockupRenderer {
    pub fn new() -> BlueprintResult<Self> {
        let mut handlebars = Handlebars::new();
        for (name, source) in [
            ("list", LIST_TEMPLATE),
            ("form", FORM_TEMPLATE),
            ("detail", DETAIL_TEMPLATE),
            ("dashboard", DASHBOARD_TEMPLATE),
            ("placeholder", PLACEHOLDER_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| BlueprintError::Render(e.to_string()))?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    pub fn preview_html(
        &self,
        entity: &Entity,
        component_type: ComponentType,
    ) -> BlueprintResult<String> {
        self.handlebars
            .render(
                template_name(component_type),
                &ComponentView::new(entity, component_type),
            )
            .map_err(|e| BlueprintError::Render(e.to_string()))
    }

    /// Component named `"{Entity} {Type}"` with its preview and rate.
    pub fn generate_component(
        &self,
        entity: &Entity,
        component_type: ComponentType,
    ) -> BlueprintResult<MockupComponent> {
        let mut generated = component(
            format!("{} {}", entity.name, component_type),
            component_type,
            Some(entity.name.as_str()),
        );
        generated.preview_html = self.preview_html(entity, component_type)?;
        Ok(generated)
    }
}
