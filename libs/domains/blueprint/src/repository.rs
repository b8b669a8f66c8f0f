use async_trait::async_trait;
use axum_helpers::SessionId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::BlueprintResult;
use crate::mockup_models::MockupProject;
use crate::models::{EntityCatalog, PricingModel};
use crate::store::SessionStore;

pub const ENTITIES_KEY: &str = "blueprint_entities";
pub const MOCKUP_KEY: &str = "mockup_project";
pub const PRICING_KEY: &str = "current_pricing";

/// Repository trait for the per-session blueprint state
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlueprintRepository: Send + Sync {
    /// Load the entity catalog; empty when nothing is stored
    async fn load_catalog(&self, session: SessionId) -> BlueprintResult<EntityCatalog>;

    async fn save_catalog(&self, session: SessionId, catalog: &EntityCatalog)
    -> BlueprintResult<()>;

    async fn load_mockup(&self, session: SessionId) -> BlueprintResult<Option<MockupProject>>;

    async fn save_mockup(&self, session: SessionId, project: &MockupProject)
    -> BlueprintResult<()>;

    async fn load_pricing(&self, session: SessionId) -> BlueprintResult<Option<PricingModel>>;

    async fn save_pricing(&self, session: SessionId, pricing: &PricingModel)
    -> BlueprintResult<()>;

    /// Round-trip probe of the underlying store
    async fn ping(&self) -> BlueprintResult<()>;
}

/// BlueprintRepository over any [`SessionStore`], one JSON value per key.
///
/// A stored value that no longer decodes is logged and treated as absent.
pub struct SessionBlueprintRepository<S: SessionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: SessionStore + ?Sized> Clone for SessionBlueprintRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SessionStore + ?Sized> SessionBlueprintRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn load_json<T: DeserializeOwned>(
        &self,
        session: SessionId,
        key: &str,
    ) -> BlueprintResult<Option<T>> {
        let Some(raw) = self.store.get(session, key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(session_id = %session, key, error = %e, "Discarding undecodable session value");
                Ok(None)
            }
        }
    }

    async fn save_json<T: Serialize + Sync>(
        &self,
        session: SessionId,
        key: &str,
        value: &T,
    ) -> BlueprintResult<()> {
        let raw = serde_json::to_string(value)?;
        tracing::debug!(session_id = %session, key, bytes = raw.len(), "Saving session value");
        self.store.set(session, key, raw).await
    }
}

#[async_trait]
impl<S: SessionStore + ?Sized> BlueprintRepository for SessionBlueprintRepository<S> {
    async fn load_catalog(&self, session: SessionId) -> BlueprintResult<EntityCatalog> {
        Ok(self
            .load_json::<EntityCatalog>(session, ENTITIES_KEY)
            .await?
            .map(EntityCatalog::normalized)
            .unwrap_or_default())
    }

    async fn save_catalog(
        &self,
        session: SessionId,
        catalog: &EntityCatalog,
    ) -> BlueprintResult<()> {
        self.save_json(session, ENTITIES_KEY, catalog).await
    }

    async fn load_mockup(&self, session: SessionId) -> BlueprintResult<Option<MockupProject>> {
        self.load_json(session, MOCKUP_KEY).await
    }

    async fn save_mockup(
        &self,
        session: SessionId,
        project: &MockupProject,
    ) -> BlueprintResult<()> {
        self.save_json(session, MOCKUP_KEY, project).await
    }

    async fn load_pricing(&self, session: SessionId) -> BlueprintResult<Option<PricingModel>> {
        self.load_json(session, PRICING_KEY).await
    }

    async fn save_pricing(
        &self,
        session: SessionId,
        pricing: &PricingModel,
    ) -> BlueprintResult<()> {
        self.save_json(session, PRICING_KEY, pricing).await
    }

    async fn ping(&self) -> BlueprintResult<()> {
        self.store.ping().await
    }
}
