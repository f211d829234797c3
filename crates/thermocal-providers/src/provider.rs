//! Provider trait definitions.
//!
//! Two seams separate the authorization flow from any concrete backend:
//!
//! - [`OAuthProvider`] builds the consent URL and exchanges authorization
//!   codes for a [`Credential`]
//! - [`CalendarProvider`] lists events on behalf of a [`Credential`]
//!
//! Both are object-safe so the server can hold them as `Arc<dyn ...>` and
//! tests can substitute stubs.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::credentials::ClientConfig;
use crate::error::ProviderResult;
use crate::raw_event::RawEvent;
use crate::tokens::Credential;

/// The calendar queried for upcoming events.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Cap on the number of events returned by one query.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options for listing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Calendar to read.
    pub calendar_id: String,
    /// Lower bound on event end time.
    pub time_min: DateTime<Utc>,
    /// Maximum number of events to return.
    pub max_results: usize,
    /// Expand recurring events into single instances.
    pub single_events: bool,
    /// Order by start time (requires `single_events`).
    pub order_by_start_time: bool,
}

impl FetchOptions {
    /// Upcoming events on the primary calendar starting from `now`: single
    /// instances, ordered by start time, capped at [`DEFAULT_MAX_RESULTS`].
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            time_min: now,
            max_results: DEFAULT_MAX_RESULTS,
            single_events: true,
            order_by_start_time: true,
        }
    }
}

/// The OAuth 2.0 authorization-code side of a provider.
pub trait OAuthProvider: Send + Sync {
    /// Builds the consent URL the user is sent to.
    ///
    /// The URL requests offline access for the given scopes and redirects
    /// back to `client.redirect_uri`.
    fn authorization_url(&self, client: &ClientConfig, scopes: &[String]) -> String;

    /// Exchanges an authorization code for a credential.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the provider rejects the code
    /// (invalid, expired, already used), a network error on transport failure.
    fn exchange_code<'a>(
        &'a self,
        client: &'a ClientConfig,
        code: &'a str,
        scopes: &'a [String],
    ) -> BoxFuture<'a, ProviderResult<Credential>>;
}

/// The event-reading side of a provider.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "google").
    fn name(&self) -> &str;

    /// Lists events, in the provider's order, using the given credential.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, rejected credentials,
    /// quota exhaustion or malformed responses.
    fn fetch_events<'a>(
        &'a self,
        credential: &'a Credential,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>>;
}
