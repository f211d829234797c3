//! OAuth authorization flow.
//!
//! [`AuthFlow`] mediates between the three states a user can be in: no
//! credential, an authorization code waiting to be exchanged, and a cached
//! credential ready for use. It is built once at startup and shared by
//! every request; the client configuration is loaded on first use and the
//! outcome, success or failure, is kept for the life of the instance.

use std::sync::Arc;
use std::time::Duration;

use thermocal_providers::{ClientConfig, ClientConfigSource, Credential, OAuthProvider, TokenCache};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ServerError, ServerResult};

/// Orchestrates consent URL construction, code exchange and credential reuse.
pub struct AuthFlow {
    source: Arc<dyn ClientConfigSource>,
    client: OnceCell<Result<ClientConfig, String>>,
    oauth: Arc<dyn OAuthProvider>,
    cache: Arc<dyn TokenCache>,
    scopes: Vec<String>,
    timeout: Duration,
}

impl AuthFlow {
    /// Creates a flow; nothing is loaded until [`initialize`](Self::initialize).
    pub fn new(
        source: Arc<dyn ClientConfigSource>,
        oauth: Arc<dyn OAuthProvider>,
        cache: Arc<dyn TokenCache>,
        scopes: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            client: OnceCell::new(),
            oauth,
            cache,
            scopes,
            timeout,
        }
    }

    /// Loads the client configuration, once.
    ///
    /// Later calls return the memoized result. A failed load is permanent for
    /// this instance: every operation keeps failing with the same
    /// configuration error instead of running half-configured.
    pub async fn initialize(&self) -> ServerResult<&ClientConfig> {
        let loaded = self
            .client
            .get_or_init(|| async {
                match self.source.load().await {
                    Ok(client) => {
                        info!(redirect_uri = %client.redirect_uri, "loaded OAuth client configuration");
                        Ok(client)
                    }
                    Err(e) => {
                        error!(error = %e, "failed to load OAuth client configuration");
                        Err(e.message().to_string())
                    }
                }
            })
            .await;

        loaded
            .as_ref()
            .map_err(|message| ServerError::configuration(message.clone()))
    }

    /// Builds the provider consent URL for offline, read-only access.
    #[instrument(skip_all)]
    pub async fn build_connect_url(&self) -> ServerResult<String> {
        let client = self.initialize().await?;
        Ok(self.oauth.authorization_url(client, &self.scopes))
    }

    /// Resolves a usable credential for `user_id`.
    ///
    /// 1. A cached credential is returned as-is, without any provider call
    ///    (`code` is ignored).
    /// 2. Otherwise a supplied `code` is exchanged; the resulting credential is
    ///    cached, persisted, and returned.
    /// 3. Otherwise `None`: the caller has to go through consent.
    ///
    /// # Errors
    ///
    /// [`ServerError::Configuration`] if the client configuration is
    /// unavailable, [`ServerError::AuthExchange`] if the exchange is rejected,
    /// fails or times out. A failed exchange leaves the cache untouched.
    #[instrument(skip_all, fields(user = %user_id, has_code = code.is_some()))]
    pub async fn resolve_credential(
        &self,
        user_id: &str,
        code: Option<&str>,
    ) -> ServerResult<Option<Arc<Credential>>> {
        let client = self.initialize().await?;

        if let Some(credential) = self.cache.get(user_id) {
            debug!("using cached credential");
            return Ok(Some(credential));
        }

        let Some(code) = code else {
            debug!("no credential cached and no code supplied");
            return Ok(None);
        };

        let exchange = self.oauth.exchange_code(client, code, &self.scopes);
        let credential = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                ServerError::auth_exchange(format!(
                    "code exchange timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ServerError::auth_exchange(e.message()))?;

        let credential = Arc::new(credential);
        self.cache.store(user_id, Arc::clone(&credential));
        self.persist_cache().await;

        info!("authorization code exchanged");
        Ok(Some(credential))
    }

    /// Flushes the token cache off the async runtime. Failures are logged
    /// only; the exchanged credential stays usable from memory.
    async fn persist_cache(&self) {
        let cache = Arc::clone(&self.cache);
        match tokio::task::spawn_blocking(move || cache.persist()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed to persist token cache"),
            Err(e) => warn!(error = %e, "token cache persist task failed"),
        }
    }
}
