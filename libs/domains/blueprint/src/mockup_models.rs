use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumIter, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::{Entity, TypeCode};
use crate::money::Money;

/// Kind of generated UI component
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
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ComponentType {
    List = 1,
    Form = 2,
    Detail = 3,
    Dashboard = 4,
    Search = 5,
    Navigation = 6,
    Report = 7,
    Chart = 8,
}

impl TypeCode for ComponentType {
    fn code(self) -> u8 {
        self as u8
    }
}

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
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Dashboard,
    List,
    Create,
    Edit,
    Detail,
    Login,
    Profile,
    Settings,
    Report,
}

/// HTML input kind of a mock form field
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
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Date,
    Select,
    Checkbox,
    Radio,
    Textarea,
    File,
}

/// Form field with a sample value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MockField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_required: bool,
    pub placeholder_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub mock_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MockupComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<MockField>,
    #[serde(default)]
    pub preview_html: String,
    pub development_cost: Money,
    pub development_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MockupPage {
    pub name: String,
    pub route: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub description: String,
    pub components: Vec<MockupComponent>,
}

fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ValidationError::new("hex_color")
            .with_message(Cow::Borrowed("Barva musí být ve formátu #RRGGBB.")));
    }
    Ok(())
}

/// Branding of a mockup project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct MockupTheme {
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: String,
    #[validate(length(min = 1, max = 200))]
    pub font_family: String,
    #[validate(length(max = 500))]
    pub logo_url: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
}

impl Default for MockupTheme {
    fn default() -> Self {
        Self {
            primary_color: "#007bff".to_string(),
            secondary_color: "#6c757d".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            logo_url: "/images/logo-placeholder.png".to_string(),
            company_name: String::new(),
        }
    }
}

/// Fabricated UI tree of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MockupProject {
    pub name: String,
    pub description: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub pages: Vec<MockupPage>,
    pub theme: MockupTheme,
}

impl MockupProject {
    pub fn page(&self, name: &str) -> Option<&MockupPage> {
        self.pages.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub entity_name: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityStat {
    pub name: String,
    pub count: u32,
    pub trend_percentage: i32,
}

/// Fake statistics for the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub total_entities: usize,
    pub total_records: u32,
    pub active_users: u32,
    pub recent_activity: Vec<ActivityItem>,
    pub entity_stats: Vec<EntityStat>,
}

/// One generated row: `Id` first, then one value per property, in order.
pub type MockRecord = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityRecords {
    pub entity: Entity,
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<MockRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityForm {
    pub entity: Entity,
    pub is_edit: bool,
    pub record_id: Option<u64>,
    pub fields: Vec<MockField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityDetail {
    pub entity: Entity,
    #[schema(value_type = Object)]
    pub record: MockRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentRequest {
    pub entity_name: String,
    pub component_type: ComponentType,
}

/// Rendered component as shown by the preview dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComponentPreview {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub html: String,
    pub cost: Money,
    pub hours: u32,
}

impl From<MockupComponent> for ComponentPreview {
    fn from(component: MockupComponent) -> Self {
        Self {
            name: component.name,
            component_type: component.component_type.to_string(),
            html: component.preview_html,
            cost: component.development_cost,
            hours: component.development_hours,
        }
    }
}

fn default_record_count() -> usize {
    10
}

fn default_sample_count() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
pub struct RecordsQuery {
    #[serde(default = "default_record_count")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
pub struct SampleQuery {
    #[serde(default = "default_sample_count")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 5, minimum = 1, maximum = 100)]
    pub count: usize,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FormQuery {
    /// Record being edited; absent for a create form
    pub id: Option<u64>,
}
