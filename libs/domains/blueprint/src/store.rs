//! Per-session key/value storage.
//!
//! Values are opaque JSON strings. Two backends: a process-local map, and one
//! directory per session with a file per key. Both forget a session once it
//! has been idle for longer than the store's TTL.

use async_trait::async_trait;
use axum_helpers::SessionId;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{BlueprintError, BlueprintResult};

/// Idle lifetime used by the `new` constructors
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(20 * 60);

/// Key/value bag scoped to one session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session: SessionId, key: &str) -> BlueprintResult<Option<String>>;

    async fn set(&self, session: SessionId, key: &str, value: String) -> BlueprintResult<()>;

    async fn remove(&self, session: SessionId, key: &str) -> BlueprintResult<()>;

    /// Drop every session idle for longer than the TTL; returns how many
    async fn evict_expired(&self) -> BlueprintResult<usize>;

    /// Cheap reachability probe for readiness checks
    async fn ping(&self) -> BlueprintResult<()>;
}

/// Run [`SessionStore::evict_expired`] every `every` until the task is
/// aborted.
pub fn spawn_session_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            match store.evict_expired().await {
                Ok(0) => {}
                Ok(evicted) => tracing::info!(evicted, "Evicted idle sessions"),
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    })
}

#[derive(Debug)]
struct SessionEntry {
    last_access: Instant,
    values: HashMap<String, String>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            last_access: Instant::now(),
            values: HashMap::new(),
        }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_access) > ttl
    }
}

/// In-memory implementation of SessionStore (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session: SessionId, key: &str) -> BlueprintResult<Option<String>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session) {
            Some(entry) if entry.is_expired(self.ttl, now) => {
                sessions.remove(&session);
                Ok(None)
            }
            Some(entry) => {
                entry.last_access = now;
                Ok(entry.values.get(key).cloned())
            }
            None => Ok(None),
        }
    }

    async fn set(&self, session: SessionId, key: &str, value: String) -> BlueprintResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|id, entry| *id == session || !entry.is_expired(self.ttl, now));

        let entry = sessions.entry(session).or_insert_with(SessionEntry::new);
        if entry.is_expired(self.ttl, now) {
            entry.values.clear();
        }
        entry.last_access = now;
        entry.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, session: SessionId, key: &str) -> BlueprintResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(&session) {
            entry.values.remove(key);
            if entry.values.is_empty() {
                sessions.remove(&session);
            }
        }
        Ok(())
    }

    async fn evict_expired(&self) -> BlueprintResult<usize> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.ttl, now));
        Ok(before - sessions.len())
    }

    async fn ping(&self) -> BlueprintResult<()> {
        let _ = self.sessions.read().await;
        Ok(())
    }
}

/// File-backed SessionStore: `<root>/<session uuid>/<key>.json`
///
/// The mtime of `<root>/<session uuid>/.last_access` marks the last request
/// that touched the session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
    ttl: Duration,
}

const LAST_ACCESS_MARKER: &str = ".last_access";

fn storage_error(action: &str, path: &Path, error: std::io::Error) -> BlueprintError {
    BlueprintError::Storage(format!("{} {}: {}", action, path.display(), error))
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_ttl(root, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of session directories on disk
    pub async fn session_count(&self) -> BlueprintResult<usize> {
        Ok(self.session_dirs().await?.len())
    }

    fn session_dir(&self, session: SessionId) -> PathBuf {
        self.root.join(session.to_string())
    }

    fn key_path(&self, session: SessionId, key: &str) -> BlueprintResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(BlueprintError::Storage(format!(
                "invalid session key '{}'",
                key
            )));
        }
        Ok(self.session_dir(session).join(format!("{}.json", key)))
    }

    async fn touch(&self, dir: &Path) -> BlueprintResult<()> {
        let marker = dir.join(LAST_ACCESS_MARKER);
        tokio::fs::write(&marker, b"")
            .await
            .map_err(|e| storage_error("touch", &marker, e))
    }

    /// Idle time of a session directory; `None` when it has no marker.
    async fn idle_for(&self, dir: &Path) -> BlueprintResult<Option<Duration>> {
        let marker = dir.join(LAST_ACCESS_MARKER);
        let modified = match tokio::fs::metadata(&marker).await {
            Ok(metadata) => metadata
                .modified()
                .map_err(|e| storage_error("stat", &marker, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("stat", &marker, e)),
        };
        Ok(Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or_default(),
        ))
    }

    async fn is_expired(&self, dir: &Path) -> BlueprintResult<bool> {
        Ok(self
            .idle_for(dir)
            .await?
            .is_some_and(|idle| idle > self.ttl))
    }

    async fn discard(&self, dir: &Path) -> BlueprintResult<()> {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", dir, e)),
        }
    }

    async fn session_dirs(&self) -> BlueprintResult<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error("list", &self.root, e)),
        };

        let mut dirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error("list", &self.root, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| storage_error("stat", &entry.path(), e))?;
            if file_type.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, session: SessionId, key: &str) -> BlueprintResult<Option<String>> {
        let path = self.key_path(session, key)?;
        let dir = self.session_dir(session);
        if self.is_expired(&dir).await? {
            self.discard(&dir).await?;
            return Ok(None);
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                self.touch(&dir).await?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", &path, e)),
        }
    }

    async fn set(&self, session: SessionId, key: &str, value: String) -> BlueprintResult<()> {
        let path = self.key_path(session, key)?;
        let dir = self.session_dir(session);
        if self.is_expired(&dir).await? {
            self.discard(&dir).await?;
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_error("create", &dir, e))?;

        // write-then-rename so readers never see a half-written value
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, value)
            .await
            .map_err(|e| storage_error("write", &staging, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| storage_error("rename", &path, e))?;
        self.touch(&dir).await
    }

    async fn remove(&self, session: SessionId, key: &str) -> BlueprintResult<()> {
        let path = self.key_path(session, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &path, e)),
        }
    }

    async fn evict_expired(&self) -> BlueprintResult<usize> {
        let mut evicted = 0;
        for dir in self.session_dirs().await? {
            if self.is_expired(&dir).await? {
                self.discard(&dir).await?;
                evicted += 1;
            }
        }
        Ok(evicted)
    }

    async fn ping(&self) -> BlueprintResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| storage_error("create", &self.root, e))?;
        let metadata = tokio::fs::metadata(&self.root)
            .await
            .map_err(|e| storage_error("stat", &self.root, e))?;
        if metadata.permissions().readonly() {
            return Err(BlueprintError::Storage(format!(
                "{} is read-only",
                self.root.display()
            )));
        }
        Ok(())
    }
}
