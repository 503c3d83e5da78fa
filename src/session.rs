//! Storage for the access token issued by the identity provider.
//!
//! The token is the only state that outlives a single read or write: it is stored at login,
//! removed at logout, and removed when the spreadsheet service rejects it.

use crate::{utils, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// The fixed key, and file name, the access token is stored under.
pub const ACCESS_TOKEN_KEY: &str = "googleAccessToken";

/// Somewhere to keep the access token between operations.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    async fn get(&self) -> Option<String>;

    /// Replaces the stored token.
    async fn set(&self, token: &str) -> Result<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}

/// Keeps the token in a file readable only by the current user.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Stores the token as `ACCESS_TOKEN_KEY` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(ACCESS_TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Option<String> {
        if !self.path.is_file() {
            return None;
        }
        match utils::read(&self.path).await {
            Ok(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!("Unable to read the access token: {e:#}");
                None
            }
        }
    }

    async fn set(&self, token: &str) -> Result<()> {
        utils::write_private(&self.path, token.trim()).await?;
        debug!("Stored the access token at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        utils::remove_file(&self.path).await?;
        debug!("Cleared the access token at {}", self.path.display());
        Ok(())
    }
}

/// Keeps the token in memory. Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Arc::new(Mutex::new(token.map(str::to_string))),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_token_store() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path());
        assert_eq!(store.get().await, None);

        store.set("ya29.token\n").await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some("ya29.token"));
        assert!(store.path().ends_with(ACCESS_TOKEN_KEY));

        store.clear().await.unwrap();
        assert_eq!(store.get().await, None);
        store.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_token_store_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set("secret").await.unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_memory_token_store_clones_share_state() {
        let store = MemoryTokenStore::new(Some("a"));
        let other = store.clone();
        other.clear().await.unwrap();
        assert_eq!(store.get().await, None);
        store.set("b").await.unwrap();
        assert_eq!(other.get().await.as_deref(), Some("b"));
    }
}
