//! Google Calendar provider implementation.
//!
//! Implements both [`OAuthProvider`] and [`CalendarProvider`] on top of one
//! shared HTTP client. The provider holds no tokens itself; credentials are
//! passed in per call.

use tracing::info;

use crate::credentials::ClientConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchOptions, OAuthProvider};
use crate::raw_event::RawEvent;
use crate::tokens::Credential;

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::oauth::OAuthClient;

const PROVIDER_NAME: &str = "google";

/// Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    oauth_client: OAuthClient,
    api_client: GoogleCalendarClient,
}

impl GoogleProvider {
    /// Creates a new Google provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_provider(PROVIDER_NAME)
            })?;

        info!(
            timeout_secs = config.timeout.as_secs(),
            "google provider ready"
        );

        Ok(Self {
            oauth_client: OAuthClient::new(http_client.clone(), config.endpoints.clone()),
            api_client: GoogleCalendarClient::new(
                http_client,
                config.endpoints.calendar_api_base,
            ),
        })
    }
}

impl OAuthProvider for GoogleProvider {
    fn authorization_url(&self, client: &ClientConfig, scopes: &[String]) -> String {
        self.oauth_client.authorization_url(client, scopes)
    }

    fn exchange_code<'a>(
        &'a self,
        client: &'a ClientConfig,
        code: &'a str,
        scopes: &'a [String],
    ) -> BoxFuture<'a, ProviderResult<Credential>> {
        Box::pin(async move {
            self.oauth_client
                .exchange_code(client, code, scopes)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events<'a>(
        &'a self,
        credential: &'a Credential,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            self.api_client
                .list_events(&credential.access_token, &options)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}
