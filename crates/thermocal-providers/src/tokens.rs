//! Credentials and the token cache.
//!
//! A [`Credential`] is what a successful code exchange yields. The
//! [`TokenCache`] maps a user identifier to the most recent one.
//!
//! [`MemoryTokenCache`] is the default: process-wide, in memory, and its
//! `persist` is inert. [`FileTokenCache`] mirrors the same map to a JSON
//! file so a restart does not force the user through consent again.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// An access credential obtained from the provider.
///
/// Token material is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for API requests.
    pub access_token: String,
    /// Refresh token, present when offline access was granted.
    pub refresh_token: Option<String>,
    /// Token type reported by the provider (normally "Bearer").
    pub token_type: Option<String>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// When the access token expires, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
    /// When this credential was obtained.
    pub obtained_at: DateTime<Utc>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

impl Credential {
    /// Creates a credential holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: None,
            scopes: Vec::new(),
            expires_at: None,
            obtained_at: Utc::now(),
        }
    }

    /// Builder method to set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    /// Builder method to set the token type.
    pub fn with_token_type(mut self, token_type: Option<String>) -> Self {
        self.token_type = token_type;
        self
    }

    /// Builder method to set the granted scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Builder method to set the expiry from a lifetime in seconds.
    ///
    /// A lifetime too large to represent leaves the expiry unknown.
    pub fn with_expires_in(mut self, expires_in_secs: Option<i64>) -> Self {
        self.expires_at = expires_in_secs
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| self.obtained_at.checked_add_signed(lifetime));
        self
    }

    /// Returns true if the provider-reported expiry has passed.
    ///
    /// Informational: the cache never evicts on expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() >= expires_at)
    }
}

/// Keyed store of the latest credential per user.
///
/// `get` and `store` are linearizable per key: a reader sees either the
/// previous credential or the new one, never a partial value. Concurrent
/// stores for the same key resolve last-writer-wins.
pub trait TokenCache: Send + Sync {
    /// Returns the credential stored for `user_id`.
    fn get(&self, user_id: &str) -> Option<Arc<Credential>>;

    /// Stores `credential` for `user_id`, replacing any previous one.
    fn store(&self, user_id: &str, credential: Arc<Credential>);

    /// Flushes the cache to its durable backing, if it has one.
    fn persist(&self) -> ProviderResult<()>;
}

/// In-memory token cache.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    entries: RwLock<HashMap<String, Arc<Credential>>>,
}

impl MemoryTokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached users.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> HashMap<String, Arc<Credential>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_all(&self, entries: HashMap<String, Arc<Credential>>) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = entries;
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self, user_id: &str) -> Option<Arc<Credential>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    fn store(&self, user_id: &str, credential: Arc<Credential>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), credential);
        debug!(user = %user_id, "stored credential");
    }

    /// No durable backing: nothing to do.
    fn persist(&self) -> ProviderResult<()> {
        Ok(())
    }
}

/// Token cache mirrored to a JSON file.
///
/// Reads come from memory; [`persist`](TokenCache::persist) writes the whole
/// map with write-then-rename and owner-only permissions on Unix.
#[derive(Debug)]
pub struct FileTokenCache {
    path: PathBuf,
    memory: MemoryTokenCache,
}

impl FileTokenCache {
    /// Opens the cache at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> ProviderResult<Self> {
        let cache = Self {
            path: path.into(),
            memory: MemoryTokenCache::new(),
        };
        cache.load()?;
        Ok(cache)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ProviderResult<()> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no token file yet");
            return Ok(());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token file: {}", e))
                .with_source(e)
        })?;

        let stored: HashMap<String, Credential> = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!("failed to parse token file: {}", e))
                .with_source(e)
        })?;

        info!(path = %self.path.display(), users = stored.len(), "loaded token file");
        self.memory.replace_all(
            stored
                .into_iter()
                .map(|(user, credential)| (user, Arc::new(credential)))
                .collect(),
        );
        Ok(())
    }
}

impl TokenCache for FileTokenCache {
    fn get(&self, user_id: &str) -> Option<Arc<Credential>> {
        self.memory.get(user_id)
    }

    fn store(&self, user_id: &str, credential: Arc<Credential>) {
        self.memory.store(user_id, credential);
    }

    fn persist(&self) -> ProviderResult<()> {
        let snapshot: HashMap<String, Credential> = self
            .memory
            .snapshot()
            .into_iter()
            .map(|(user, credential)| (user, Credential::clone(&credential)))
            .collect();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::internal(format!("failed to create token directory: {}", e))
                    .with_source(e)
            })?;
        }

        let content = serde_json::to_string_pretty(&snapshot).map_err(|e| {
            ProviderError::internal(format!("failed to serialize tokens: {}", e)).with_source(e)
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).map_err(|e| {
            ProviderError::internal(format!("failed to write token file: {}", e)).with_source(e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::internal(format!("failed to rename token file: {}", e)).with_source(e)
        })?;

        debug!(path = %self.path.display(), "persisted token file");
        Ok(())
    }
}
