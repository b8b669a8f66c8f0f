use crate::{env_or_default, env_parse_optional, ConfigError, FromEnv};
use std::path::PathBuf;
use std::time::Duration;

/// Idle time after which a session is discarded
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(20 * 60);

/// Where per-session blobs are kept
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process memory; everything is lost on restart
    Memory,
    /// One directory per session under the given root
    File(PathBuf),
}

/// Session storage configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    /// Seed for the mock-data generator; random when unset
    pub mock_seed: Option<u64>,
    /// Sessions idle for longer than this are evicted
    pub ttl: Duration,
}

impl SessionConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: SessionBackend::Memory,
            mock_seed: None,
            ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl FromEnv for SessionConfig {
    /// Reads:
    /// - SESSION_BACKEND: `memory` (default) or `file`
    /// - SESSION_DIR: root directory for the file backend, defaults to `./sessions`
    /// - MOCK_SEED: optional u64
    /// - SESSION_TTL_SECS: idle lifetime in seconds, defaults to 1200
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match env_or_default("SESSION_BACKEND", "memory")
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => SessionBackend::Memory,
            "file" => SessionBackend::File(PathBuf::from(env_or_default("SESSION_DIR", "./sessions"))),
            other => {
                return Err(ConfigError::ParseError {
                    key: "SESSION_BACKEND".to_string(),
                    details: format!("unknown backend '{}', expected 'memory' or 'file'", other),
                })
            }
        };

        let ttl = match env_parse_optional::<u64>("SESSION_TTL_SECS")? {
            None => DEFAULT_SESSION_TTL,
            Some(0) => {
                return Err(ConfigError::ParseError {
                    key: "SESSION_TTL_SECS".to_string(),
                    details: "must be greater than zero".to_string(),
                })
            }
            Some(secs) => Duration::from_secs(secs),
        };

        Ok(Self {
            backend,
            mock_seed: env_parse_optional("MOCK_SEED")?,
            ttl,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
