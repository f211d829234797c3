//! OAuth client registration (client id, secret, redirect URI).
//!
//! The registration is read once from the JSON file downloaded from the
//! Google Cloud Console. Supported shapes:
//!
//! 1. Console download: `{"web": {...}}` or `{"installed": {...}}`
//! 2. Flat: `{"client_id": "...", "client_secret": "...", "redirect_uris": [...]}`
//!
//! In both, `redirect_uris[0]` (or a single `redirect_uri`) is the callback
//! the provider sends the user back to.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::BoxFuture;

/// The application's OAuth client registration.
///
/// Immutable once loaded. The secret is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// Where the provider redirects after consent.
    pub redirect_uri: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// On-disk shape of the credentials file.
#[derive(Debug, Deserialize)]
struct CredentialsDocument {
    installed: Option<RegistrationSection>,
    web: Option<RegistrationSection>,
    #[serde(flatten)]
    flat: RegistrationSection,
}

#[derive(Debug, Default, Deserialize)]
struct RegistrationSection {
    client_id: Option<String>,
    client_secret: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
    redirect_uri: Option<String>,
}

impl RegistrationSection {
    fn into_config(self) -> ProviderResult<ClientConfig> {
        let redirect_uri = self
            .redirect_uri
            .or_else(|| self.redirect_uris.into_iter().next());

        let config = ClientConfig::new(
            self.client_id.unwrap_or_default(),
            self.client_secret.unwrap_or_default(),
            redirect_uri.unwrap_or_default(),
        );
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    /// Creates a new client configuration.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Parses a credentials JSON document.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let doc: CredentialsDocument = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("failed to parse credentials JSON: {}", e))
                .with_source(e)
        })?;

        match doc.web.or(doc.installed) {
            Some(section) => section.into_config(),
            None => doc.flat.into_config(),
        }
    }

    /// Reads and parses a credentials file.
    pub async fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        debug!(path = %path.display(), "loaded OAuth client credentials");
        Self::from_json(&content)
    }

    /// Checks that every field is present.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(ProviderError::configuration("client_id is required"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ProviderError::configuration("client_secret is required"));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(ProviderError::configuration(
                "a redirect URI is required (redirect_uris[0])",
            ));
        }
        Ok(())
    }
}

/// Somewhere a [`ClientConfig`] can be loaded from.
pub trait ClientConfigSource: Send + Sync {
    /// Loads the client configuration.
    fn load(&self) -> BoxFuture<'_, ProviderResult<ClientConfig>>;
}

/// Loads the client configuration from a credentials JSON file.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    /// Creates a source reading the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClientConfigSource for CredentialsFile {
    fn load(&self) -> BoxFuture<'_, ProviderResult<ClientConfig>> {
        Box::pin(ClientConfig::from_file(&self.path))
    }
}

/// An already-known configuration is its own source.
impl ClientConfigSource for ClientConfig {
    fn load(&self) -> BoxFuture<'_, ProviderResult<ClientConfig>> {
        let config = self.clone();
        Box::pin(async move {
            config.validate()?;
            Ok(config)
        })
    }
}
