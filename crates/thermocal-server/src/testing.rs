//! Stub providers shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use thermocal_providers::{
    BoxFuture, CalendarProvider, ClientConfig, ClientConfigSource, Credential, FetchOptions,
    OAuthProvider, ProviderError, ProviderResult, RawEvent, RawEventTime,
};

pub const GOOD_CODE: &str = "abc";

pub fn client_config() -> ClientConfig {
    ClientConfig::new(
        "client-id",
        "client-secret",
        "http://localhost:4000/calendar/oauth",
    )
}

/// Counts loads; fails every load when `fail` is set.
#[derive(Default)]
pub struct StubSource {
    pub loads: AtomicUsize,
    pub fail: bool,
}

impl StubSource {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl ClientConfigSource for StubSource {
    fn load(&self) -> BoxFuture<'_, ProviderResult<ClientConfig>> {
        Box::pin(async move {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::configuration(
                    "failed to read credentials file client_secret.json: No such file or directory",
                ))
            } else {
                Ok(client_config())
            }
        })
    }
}

/// Accepts [`GOOD_CODE`] and rejects everything else.
#[derive(Default)]
pub struct StubOAuth {
    pub exchanges: AtomicUsize,
    pub delay: Option<Duration>,
}

impl OAuthProvider for StubOAuth {
    fn authorization_url(&self, client: &ClientConfig, scopes: &[String]) -> String {
        format!(
            "https://consent.test/auth?access_type=offline&scope={}&client_id={}",
            scopes.join("+"),
            client.client_id
        )
    }

    fn exchange_code<'a>(
        &'a self,
        _client: &'a ClientConfig,
        code: &'a str,
        scopes: &'a [String],
    ) -> BoxFuture<'a, ProviderResult<Credential>> {
        Box::pin(async move {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if code == GOOD_CODE {
                Ok(Credential::new(format!("token-for-{}", code))
                    .with_scopes(scopes.to_vec())
                    .with_expires_in(Some(3600)))
            } else {
                Err(ProviderError::authentication(
                    "token exchange failed (400 Bad Request): invalid_grant",
                ))
            }
        })
    }
}

/// Returns canned events, or a canned error.
#[derive(Default)]
pub struct StubCalendar {
    pub events: Vec<RawEvent>,
    pub error: Option<ProviderError>,
    pub delay: Option<Duration>,
    pub fetches: AtomicUsize,
    pub last_options: Mutex<Option<FetchOptions>>,
}

impl StubCalendar {
    pub fn with_events(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn last_options(&self) -> Option<FetchOptions> {
        self.last_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CalendarProvider for StubCalendar {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch_events<'a>(
        &'a self,
        _credential: &'a Credential,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            *self
                .last_options
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(options);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.error {
                Some(err) => Err(ProviderError::new(err.code(), err.message())),
                None => Ok(self.events.clone()),
            }
        })
    }
}

pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> RawEvent {
    RawEvent::new(id, RawEventTime::DateTime(start.to_string()), "primary")
        .with_summary(summary)
        .with_end(RawEventTime::DateTime(end.to_string()))
}
