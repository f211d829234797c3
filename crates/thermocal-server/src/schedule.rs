//! Upcoming schedule retrieval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thermocal_core::ScheduleEntry;
use thermocal_providers::{CalendarProvider, Credential, FetchOptions, normalize_events};
use tracing::{debug, instrument, warn};

use crate::error::{ServerError, ServerResult};

/// Lists upcoming events for a credential and normalizes them.
pub struct ScheduleService {
    calendar: Arc<dyn CalendarProvider>,
    timeout: Duration,
}

impl ScheduleService {
    /// Creates a service over the given provider with a per-call timeout.
    pub fn new(calendar: Arc<dyn CalendarProvider>, timeout: Duration) -> Self {
        Self { calendar, timeout }
    }

    /// Returns the upcoming timed events on the primary calendar, in the
    /// provider's start-time order.
    ///
    /// The window starts at the moment of the call. All-day events are
    /// dropped. Any provider failure, including a timeout, is a
    /// [`ServerError::Retrieval`].
    #[instrument(skip_all, fields(provider = self.calendar.name()))]
    pub async fn list_upcoming(&self, credential: &Credential) -> ServerResult<Vec<ScheduleEntry>> {
        if credential.is_expired() {
            warn!("cached credential is past its expiry, the provider may reject it");
        }

        let options = FetchOptions::upcoming(Utc::now());
        let fetch = self.calendar.fetch_events(credential, options);
        let raw_events = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| {
                ServerError::retrieval(format!(
                    "event listing timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.is_auth_failure() {
                    warn!(error = %e, "provider rejected the cached credential, reconnect via /calendar/connect");
                }
                ServerError::retrieval(e.message())
            })?;

        let entries = normalize_events(&raw_events);
        debug!(
            fetched = raw_events.len(),
            returned = entries.len(),
            "normalized upcoming events"
        );
        Ok(entries)
    }
}
