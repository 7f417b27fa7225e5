//! Session store: the persisted bearer token plus an observable "authenticated" flag.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result, TokenStoreError};

/// Durable home of the single `token` entry.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    /// Erases every persisted session entry. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        let persisted: PersistedSession =
            serde_json::from_str(&raw).map_err(|source| TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(persisted.token))
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        let serialized = serde_json::to_string(&PersistedSession {
            token: token.to_string(),
        })
        .map_err(|source| TokenStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|err| self.io_error(err))
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().await = None;
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Proof that a token was present when the session was checked.
///
/// Only [`SessionStore::authenticated`] hands these out, so requests that need a
/// bearer credential cannot be built without one.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    token: BearerToken,
}

impl AuthenticatedSession {
    pub fn token(&self) -> &BearerToken {
        &self.token
    }
}

pub struct SessionStore {
    store: Arc<dyn TokenStore>,
    authenticated: watch::Sender<bool>,
}

impl SessionStore {
    /// Starts unauthenticated even when a token is already persisted.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            store,
            authenticated,
        }
    }

    /// Starts with the flag reconciled against the persisted token.
    pub async fn restore(store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = Self::new(store);
        let has_token = session.stored_token().await?.is_some();
        session.authenticated.send_replace(has_token);
        debug!(authenticated = has_token, "restored session state");
        Ok(session)
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    pub async fn persist_token(&self, token: &str) -> Result<()> {
        self.store.save(token).await?;
        self.authenticated.send_replace(true);
        info!("session token persisted");
        Ok(())
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.store.clear().await?;
        self.authenticated.send_replace(false);
        info!("session cleared");
        Ok(())
    }

    pub async fn authenticated(&self) -> Result<AuthenticatedSession> {
        let token = self
            .stored_token()
            .await?
            .ok_or(ClientError::NotAuthenticated)?;
        Ok(AuthenticatedSession {
            token: BearerToken(token),
        })
    }

    /// A corrupt store counts as signed out so a new login can overwrite it.
    async fn stored_token(&self) -> Result<Option<String>> {
        let token = match self.store.load().await {
            Ok(token) => token,
            Err(err @ TokenStoreError::Corrupt { .. }) => {
                warn!("ignoring unreadable session: {err}");
                None
            }
            Err(err) => return Err(err.into()),
        };
        Ok(token.filter(|token| !token.trim().is_empty()))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
