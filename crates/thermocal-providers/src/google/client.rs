//! Google Calendar API client.
//!
//! A thin HTTP client for the `events.list` endpoint: request building,
//! status classification and conversion of API events into [`RawEvent`]s.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FetchOptions;
use crate::raw_event::{RawEvent, RawEventTime};

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl GoogleCalendarClient {
    /// Creates a client against the given Calendar API base URL.
    pub fn new(http_client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base: api_base.into(),
        }
    }

    /// Lists events from a calendar, in the order the API returns them.
    ///
    /// Cancelled events and events without a start are dropped. Times are
    /// kept as the API wrote them. At most `options.max_results` events are returned.
    pub async fn list_events(
        &self,
        access_token: &str,
        options: &FetchOptions,
    ) -> ProviderResult<Vec<RawEvent>> {
        let response = self.list_events_page(access_token, options).await?;

        let mut events: Vec<RawEvent> = response
            .items
            .into_iter()
            .filter_map(|event| convert_event(event, &options.calendar_id))
            .collect();
        events.truncate(options.max_results);

        debug!(
            "fetched {} events from calendar {}",
            events.len(),
            options.calendar_id
        );
        Ok(events)
    }

    /// Fetches a single page of events.
    async fn list_events_page(
        &self,
        access_token: &str,
        options: &FetchOptions,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&options.calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", options.time_min.to_rfc3339()),
                ("maxResults", options.max_results.to_string()),
                ("singleEvents", options.single_events.to_string()),
            ]);

        if options.order_by_start_time {
            request = request.query(&[("orderBy", "startTime")]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::bad_request(format!(
                "request rejected: {}",
                body
            )));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(
                "access token expired or invalid",
            ));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization("access denied to calendar"));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!(
                "calendar {} not found",
                options.calendar_id
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })
    }
}

/// Converts a Google Calendar API event to a [`RawEvent`].
fn convert_event(event: ApiEvent, calendar_id: &str) -> Option<RawEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let id = event.id?;

    let Some(start) = event.start.and_then(event_time) else {
        warn!("event {} has no start time", id);
        return None;
    };
    let end = event.end.and_then(event_time);

    let mut raw_event = RawEvent::new(id, start, calendar_id);
    raw_event.summary = event.summary;
    raw_event.description = event.description;
    raw_event.end = end;
    raw_event.status = event.status;

    Some(raw_event)
}

/// Picks an API time, preferring `dateTime` over `date`.
fn event_time(time: ApiEventTime) -> Option<RawEventTime> {
    match (time.date_time, time.date) {
        (Some(dt), _) => Some(RawEventTime::DateTime(dt)),
        (None, Some(date)) => Some(RawEventTime::Date(date)),
        (None, None) => None,
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
    status: Option<String>,
}

/// Event time from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}
