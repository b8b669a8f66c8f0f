//! Random sample data for mockups.
//!
//! The generator owns no global state: callers hand it an RNG and a
//! reference date, so a seeded `StdRng` gives reproducible output.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;

use crate::mockup_models::{ActivityItem, DashboardData, EntityStat, FieldType, MockField, MockRecord};
use crate::models::{Entity, PropertyType};

const SAMPLE_WORDS: [&str; 7] = ["Sample", "Test", "Demo", "Example", "Mock", "Fake", "Generated"];

const FIRST_NAMES: [&str; 10] = [
    "Jan", "Petr", "Pavel", "Tomáš", "Martin", "Jana", "Eva", "Anna", "Marie", "Lucie",
];

const LAST_NAMES: [&str; 10] = [
    "Novák", "Svoboda", "Novotný", "Dvořák", "Černý", "Procházka", "Kučera", "Veselý",
    "Horák", "Němec",
];

const COMPANIES: [&str; 8] = [
    "Acme Corp",
    "TechSoft s.r.o.",
    "DataFlow a.s.",
    "WebPro Solutions",
    "Digital Dynamics",
    "CloudTech Services",
    "InnovateLab",
    "FutureSoft",
];

const COLORS: [&str; 8] = [
    "#007bff", "#28a745", "#dc3545", "#ffc107", "#17a2b8", "#6f42c1", "#e83e8c", "#fd7e14",
];

const ACTIONS: [&str; 4] = ["vytvořil", "upravil", "smazal", "zobrazil"];

const RECENT_ACTIVITY_COUNT: usize = 5;

/// HTML input kind for a property type.
pub fn field_type_for(property_type: PropertyType) -> FieldType {
    match property_type {
        PropertyType::String | PropertyType::Phone | PropertyType::Url => FieldType::Text,
        PropertyType::Integer | PropertyType::Decimal => FieldType::Number,
        PropertyType::DateTime => FieldType::Date,
        PropertyType::Boolean => FieldType::Checkbox,
        PropertyType::Email => FieldType::Email,
        PropertyType::Json => FieldType::Textarea,
        PropertyType::File => FieldType::File,
    }
}

pub struct MockDataGenerator<R: Rng> {
    rng: R,
    today: NaiveDate,
}

impl<R: Rng> MockDataGenerator<R> {
    pub fn new(rng: R, today: NaiveDate) -> Self {
        Self { rng, today }
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.random_range(0..items.len())]
    }

    /// One sample value. `index` feeds the url and json/file patterns.
    pub fn generate_value(&mut self, property_type: PropertyType, index: usize) -> String {
        match property_type {
            PropertyType::String => {
                let word = self.pick(&SAMPLE_WORDS);
                format!("{} {}", word, self.rng.random_range(100..999))
            }
            PropertyType::Integer => self.rng.random_range(1..1000).to_string(),
            PropertyType::Decimal => format!("{:.2}", self.rng.random::<f64>() * 1000.0),
            PropertyType::DateTime => {
                let offset = Duration::days(self.rng.random_range(-365..365));
                (self.today + offset).format("%Y-%m-%d").to_string()
            }
            PropertyType::Boolean => self.rng.random_bool(0.5).to_string(),
            PropertyType::Email => {
                let first = self.pick(&FIRST_NAMES);
                let last = self.pick(&LAST_NAMES);
                format!("{}.{}@example.com", first, last).to_lowercase()
            }
            PropertyType::Phone => format!(
                "+420 {} {} {}",
                self.rng.random_range(600..799),
                self.rng.random_range(100..999),
                self.rng.random_range(100..999)
            ),
            PropertyType::Url => format!("https://example{}.com", index),
            PropertyType::Json | PropertyType::File => format!("Sample data {}", index),
        }
    }

    pub fn generate_values(&mut self, property_type: PropertyType, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| self.generate_value(property_type, i))
            .collect()
    }

    /// `count` rows with `Id` 1..=count followed by one value per property.
    ///
    /// A property literally named `Id` is overwritten by the row id.
    pub fn generate_records(&mut self, entity: &Entity, count: usize) -> Vec<MockRecord> {
        (1..=count)
            .map(|id| {
                let mut record = MockRecord::new();
                record.insert("Id".to_string(), id.to_string());
                for property in &entity.properties {
                    let value = self.generate_value(property.property_type, id);
                    record.entry(property.name.clone()).or_insert(value);
                }
                record
            })
            .collect()
    }

    /// One form field per property, each with a sample value.
    pub fn mock_fields(&mut self, entity: &Entity) -> Vec<MockField> {
        entity
            .properties
            .iter()
            .map(|property| MockField {
                name: property.name.clone(),
                label: property.name.clone(),
                field_type: field_type_for(property.property_type),
                is_required: property.is_required,
                placeholder_text: format!("Zadejte {}", property.name.to_lowercase()),
                options: Vec::new(),
                mock_value: self.generate_value(property.property_type, 0),
            })
            .collect()
    }

    pub fn random_company(&mut self) -> &'static str {
        self.pick(&COMPANIES)
    }

    pub fn random_color(&mut self) -> &'static str {
        self.pick(&COLORS)
    }

    /// Fake usage statistics over `entities`.
    pub fn dashboard_data(&mut self, entities: &[Entity], now: DateTime<Utc>) -> DashboardData {
        let total_records = entities
            .iter()
            .map(|_| self.rng.random_range(50..500u32))
            .sum::<u32>();
        let active_users = self.rng.random_range(10..100);

        let mut recent_activity: Vec<ActivityItem> = if entities.is_empty() {
            Vec::new()
        } else {
            (0..RECENT_ACTIVITY_COUNT)
                .map(|_| {
                    let entity = &entities[self.rng.random_range(0..entities.len())];
                    let action = self.pick(&ACTIONS);
                    let minutes_ago = self.rng.random_range(1..60);
                    ActivityItem {
                        description: format!("Uživatel {} {}", action, entity.name),
                        timestamp: now - Duration::minutes(minutes_ago),
                        entity_name: entity.name.clone(),
                        action: action.to_string(),
                    }
                })
                .collect()
        };
        recent_activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let entity_stats = entities
            .iter()
            .map(|entity| EntityStat {
                name: entity.name.clone(),
                count: self.rng.random_range(10..200),
                trend_percentage: self.rng.random_range(-20..50),
            })
            .collect();

        DashboardData {
            total_entities: entities.len(),
            total_records,
            active_users,
            recent_activity,
            entity_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityType, Property};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generator(seed: u64) -> MockDataGenerator<StdRng> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        MockDataGenerator::new(StdRng::seed_from_u64(seed), today)
    }

    fn product() -> Entity {
        Entity::new("Product", EntityType::Core, Utc::now())
            .property(Property::new("Name", PropertyType::String).required())
            .property(Property::new("Price", PropertyType::Decimal))
            .property(Property::new("Contact", PropertyType::Email))
    }

    #[test]
    fn test_string_values() {
        let mut generator = generator(1);
        for value in generator.generate_values(PropertyType::String, 50) {
            let (word, number) = value.split_once(' ').unwrap();
            assert!(SAMPLE_WORDS.contains(&word));
            let number: u32 = number.parse().unwrap();
            assert!((100..999).contains(&number));
        }
    }

    #[test]
    fn test_numeric_values_in_range() {
        let mut generator = generator(2);
        for value in generator.generate_values(PropertyType::Integer, 100) {
            let n: i64 = value.parse().unwrap();
            assert!((1..1000).contains(&n));
        }
        for value in generator.generate_values(PropertyType::Decimal, 100) {
            let (_, decimals) = value.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2);
            let n: f64 = value.parse().unwrap();
            assert!((0.0..=1000.0).contains(&n));
        }
    }

    #[test]
    fn test_dates_within_a_year_of_reference() {
        let mut generator = generator(3);
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        for value in generator.generate_values(PropertyType::DateTime, 100) {
            let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d").unwrap();
            let days = (date - today).num_days();
            assert!((-365..365).contains(&days));
        }
    }

    #[test]
    fn test_email_phone_and_indexed_values() {
        let mut generator = generator(4);

        let email = generator.generate_value(PropertyType::Email, 0);
        assert!(email.ends_with("@example.com"));
        assert_eq!(email, email.to_lowercase());

        let phone = generator.generate_value(PropertyType::Phone, 0);
        assert!(phone.starts_with("+420 "));
        assert_eq!(phone.split(' ').count(), 4);

        assert_eq!(
            generator.generate_values(PropertyType::Url, 2),
            vec!["https://example0.com", "https://example1.com"]
        );
        assert_eq!(generator.generate_value(PropertyType::File, 7), "Sample data 7");

        let boolean = generator.generate_value(PropertyType::Boolean, 0);
        assert!(boolean == "true" || boolean == "false");
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = generator(42).generate_records(&product(), 3);
        let b = generator(42).generate_records(&product(), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_records_are_ordered_with_sequential_ids() {
        let records = generator(5).generate_records(&product(), 4);
        assert_eq!(records.len(), 4);

        for (i, record) in records.iter().enumerate() {
            let keys: Vec<&str> = record.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["Id", "Name", "Price", "Contact"]);
            assert_eq!(record["Id"], (i + 1).to_string());
        }
    }

    #[test]
    fn test_mock_fields() {
        let fields = generator(6).mock_fields(&product());
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert!(fields[0].is_required);
        assert_eq!(fields[0].placeholder_text, "Zadejte name");
        assert_eq!(fields[1].field_type, FieldType::Number);
        assert_eq!(fields[2].field_type, FieldType::Email);
        assert!(fields.iter().all(|f| !f.mock_value.is_empty()));
    }

    #[test]
    fn test_dashboard_data() {
        let entities = vec![product(), Entity::new("Order", EntityType::Complex, Utc::now())];
        let now = Utc::now();
        let data = generator(7).dashboard_data(&entities, now);

        assert_eq!(data.total_entities, 2);
        assert!((100..1000).contains(&data.total_records));
        assert!((10..100).contains(&data.active_users));
        assert_eq!(data.recent_activity.len(), 5);
        assert!(
            data.recent_activity
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp)
        );
        assert!(data.recent_activity.iter().all(|a| a.timestamp < now));
        assert_eq!(data.entity_stats.len(), 2);
        assert!(
            data.entity_stats
                .iter()
                .all(|s| (10..200).contains(&s.count) && (-20..50).contains(&s.trend_percentage))
        );
    }

    #[test]
    fn test_dashboard_without_entities_has_no_activity() {
        let data = generator(8).dashboard_data(&[], Utc::now());
        assert_eq!(data.total_entities, 0);
        assert_eq!(data.total_records, 0);
        assert!(data.recent_activity.is_empty());
        assert!(data.entity_stats.is_empty());
    }

    #[test]
    fn test_random_company_and_color() {
        let mut generator = generator(9);
        assert!(COMPANIES.contains(&generator.random_company()));
        let color = generator.random_color();
        assert!(color.starts_with('#'));
        assert_eq!(color.len(), 7);
    }
}
