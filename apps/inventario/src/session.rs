//! # Session Store
//!
//! Device-local key-value storage for the logged-in user.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key: "user_session"                                                   │
//! │  value: {"userId":1,"userEmail":"ana@example.com","userName":"Ana R"}  │
//! │                                                                         │
//! │  login / register ──► set       logout ──► remove                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`FileSessionStore`] keeps one file per key in a directory.
//! [`MemorySessionStore`] is for tests and throwaway runs.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use inventario_core::{Session, SESSION_KEY};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid session key: '{0}'")]
    InvalidKey(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Opaque string storage keyed by name.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> SessionResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> SessionResult<()>;
}

// =============================================================================
// File-backed store
// =============================================================================

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSessionStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> SessionResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SessionError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // write-then-rename so a crash never leaves half a file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(?path, "Session entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> SessionResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> SessionResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed helpers
// =============================================================================

/// Reads the current session. A corrupt entry counts as logged out.
pub async fn load_session(store: &dyn SessionStore) -> SessionResult<Option<Session>> {
    let Some(raw) = store.get(SESSION_KEY).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!("Discarding unreadable session entry: {}", e);
            Ok(None)
        }
    }
}

pub async fn save_session(store: &dyn SessionStore, session: &Session) -> SessionResult<()> {
    let raw = serde_json::to_string(session)?;
    store.set(SESSION_KEY, &raw).await
}

pub async fn clear_session(store: &dyn SessionStore) -> SessionResult<()> {
    store.remove(SESSION_KEY).await
}
