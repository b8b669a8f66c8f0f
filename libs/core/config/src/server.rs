use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - CORS_ALLOWED_ORIGIN: comma-separated, defaults to http://localhost:3000
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", "8080").parse().map_err(|e| {
            ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            }
        })?;

        let cors_allowed_origins =
            parse_origins(&env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ORIGIN));
        if cors_allowed_origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}
