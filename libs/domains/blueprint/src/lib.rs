//! Blueprint Domain
//!
//! Session-scoped entity designer with a deterministic price calculator,
//! markdown quotes, and a generated UI mockup filled with random sample data.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (blueprint, pricing, mockup)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Validation, catalog mutations, quotes, mockups
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────┐
//! │ Repository  │ ──▶ │ SessionStore │  ← memory or one directory per session
//! └──────┬──────┘     └──────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, rates, pricing, mockup tree
//! └─────────────┘
//! ```
//!
//! Pricing (`pricing`, `rates`, `money`) is pure and never touches the
//! session; randomness is confined to `mock_data`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_blueprint::{
//!     handlers,
//!     repository::SessionBlueprintRepository,
//!     service::{CatalogService, shared_rng},
//!     store::InMemorySessionStore,
//! };
//!
//! let store = Arc::new(InMemorySessionStore::new());
//! let repository = Arc::new(SessionBlueprintRepository::new(store));
//! let service = CatalogService::new(repository, shared_rng(None));
//!
//! // Router expects a session cookie; see `axum_helpers::session_layer`
//! let router = handlers::blueprint::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod messages;
pub mod mock_data;
pub mod mockup;
pub mod mockup_models;
pub mod models;
pub mod money;
pub mod pricing;
pub mod rates;
pub mod report;
pub mod repository;
pub mod service;
pub mod store;
pub mod templates;

// Re-export commonly used types
pub use error::{BlueprintError, BlueprintResult};
pub use mockup::MockupRenderer;
pub use mockup_models::{ComponentType, MockupProject, MockupTheme};
pub use models::{
    CreateEntity, Entity, EntityCatalog, EntityType, PricingModel, Property, PropertyType,
    Relation, RelationType, UpdateEntity,
};
pub use money::{Currency, Money};
pub use pricing::calculate_pricing;
pub use report::ReportRenderer;
pub use repository::{BlueprintRepository, SessionBlueprintRepository};
pub use service::{CatalogService, MockupService, PricingService, SharedRng, shared_rng};
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore, spawn_session_sweeper};
