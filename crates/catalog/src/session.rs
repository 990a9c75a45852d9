use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    CatalogError,
    auth::{TokenEndpoint, Tokens},
};

/// Durable home for the access/refresh token pair.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<Tokens>, CatalogError>;
    fn save(&self, tokens: &Tokens) -> Result<(), CatalogError>;
    fn clear(&self) -> Result<(), CatalogError>;
}

/// Keeps the tokens as a small json file.
#[derive(Debug, Clone)]
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
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Tokens>, CatalogError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tokens: &Tokens) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(tokens)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CatalogError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Non-persistent store, for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<Tokens>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Tokens>, CatalogError> {
        Ok(lock(&self.tokens).clone())
    }

    fn save(&self, tokens: &Tokens) -> Result<(), CatalogError> {
        *lock(&self.tokens) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CatalogError> {
        lock(&self.tokens).take();
        Ok(())
    }
}

/// The current bearer credential, shared by every clone.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    tokens: Arc<Mutex<Option<Tokens>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("active", &self.has_session())
            .finish()
    }
}

impl Session {
    /// Restores whatever the store holds. An unreadable store starts signed out.
    pub fn open(store: impl TokenStore + 'static) -> Self {
        let tokens = match store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "could not restore session, starting signed out");
                None
            }
        };

        Self {
            store: Arc::new(store),
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn ephemeral() -> Self {
        Self::open(MemoryTokenStore::default())
    }

    pub fn has_session(&self) -> bool {
        lock(&self.tokens).is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        lock(&self.tokens).as_ref().map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        lock(&self.tokens).as_ref().map(|t| t.refresh_token.clone())
    }

    pub async fn establish(
        &self,
        endpoint: &TokenEndpoint,
        username: &str,
        password: &str,
    ) -> Result<(), CatalogError> {
        let tokens = endpoint.exchange(username, password).await.inspect_err(|e| {
            tracing::error!(%username, error = %e, "login failed");
        })?;

        self.store.save(&tokens)?;
        *lock(&self.tokens) = Some(tokens);
        tracing::info!(%username, "session established");
        Ok(())
    }

    /// Drops the tokens in memory even when the store fails to forget them.
    pub fn clear(&self) -> Result<(), CatalogError> {
        if lock(&self.tokens).take().is_some() {
            tracing::info!("session cleared");
        }
        self.store.clear().inspect_err(|e| {
            tracing::warn!(error = %e, "stored session could not be removed");
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
