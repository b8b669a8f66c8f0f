use core_config::{app_info, server::ServerConfig, session::SessionConfig, AppInfo, FromEnv};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let session = SessionConfig::from_env()?; // Uses defaults: in-memory, random seed

        Ok(Self {
            app: app_info!(),
            server,
            session,
            environment,
        })
    }
}
