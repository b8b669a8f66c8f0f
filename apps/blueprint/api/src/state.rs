//! Application state management.
//!
//! The state holds everything the domain routers are built from:
//! - Configuration
//! - The session store, behind the blueprint repository
//! - The shared mock-data RNG and the template renderers

use core_config::session::SessionBackend;
use domain_blueprint::{
    FileSessionStore, InMemorySessionStore, MockupRenderer, ReportRenderer,
    SessionBlueprintRepository, SessionStore, SharedRng, shared_rng, spawn_session_sweeper,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;

/// Repository over whichever store the configuration selects
pub type Repository = SessionBlueprintRepository<dyn SessionStore>;

/// Shared application state.
///
/// Cloned into the ready router; every field is an `Arc` or cheap to copy.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// The raw store, also swept for idle sessions
    pub sessions: Arc<dyn SessionStore>,
    pub repository: Arc<Repository>,
    /// Seeded from `MOCK_SEED` when set
    pub rng: SharedRng,
    pub reports: ReportRenderer,
    pub mockups: MockupRenderer,
}

impl AppState {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let ttl = config.session.ttl;
        let store: Arc<dyn SessionStore> = match &config.session.backend {
            SessionBackend::Memory => {
                info!(ttl_secs = ttl.as_secs(), "Using in-memory session store");
                Arc::new(InMemorySessionStore::with_ttl(ttl))
            }
            SessionBackend::File(root) => {
                info!(root = %root.display(), ttl_secs = ttl.as_secs(), "Using file session store");
                Arc::new(FileSessionStore::with_ttl(root.clone(), ttl))
            }
        };

        if let Some(seed) = config.session.mock_seed {
            info!(seed, "Mock data generator is seeded");
        }
        let rng = shared_rng(config.session.mock_seed);

        Ok(Self {
            repository: Arc::new(SessionBlueprintRepository::new(store.clone())),
            sessions: store,
            rng,
            reports: ReportRenderer::new()?,
            mockups: MockupRenderer::new()?,
            config,
        })
    }

    /// Start the idle-session sweeper. Runs at a quarter of the TTL, at
    /// most once a minute, until the handle is aborted.
    pub fn start_session_sweeper(&self) -> JoinHandle<()> {
        let every = (self.config.session.ttl / 4)
            .clamp(Duration::from_secs(1), Duration::from_secs(60));
        spawn_session_sweeper(self.sessions.clone(), every)
    }
}
