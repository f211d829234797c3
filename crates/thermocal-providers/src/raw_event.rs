//! Raw event type from calendar providers.
//!
//! [`RawEvent`] is the provider-agnostic shape of an event as it comes off
//! the wire, before normalization into a
//! [`ScheduleEntry`](thermocal_core::ScheduleEntry).

use serde::{Deserialize, Serialize};

/// When a raw event starts or ends.
///
/// Providers report either a definite instant or a bare date for all-day
/// events. Both are kept exactly as the provider wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// A definite instant (the provider's `dateTime` text).
    DateTime(String),
    /// An all-day event date (the provider's `date` text).
    Date(String),
}

impl RawEventTime {
    /// Returns true if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the instant text, if this is a timed value.
    pub fn date_time(&self) -> Option<&str> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::Date(_) => None,
        }
    }
}

/// A calendar event as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Provider-specific event identifier.
    pub id: String,
    /// The event title.
    pub summary: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// When the event starts.
    pub start: RawEventTime,
    /// When the event ends, if reported.
    pub end: Option<RawEventTime>,
    /// Provider status (e.g. "confirmed", "tentative").
    pub status: Option<String>,
    /// The calendar this event came from.
    pub calendar_id: String,
}

impl RawEvent {
    /// Creates a new raw event with the required fields.
    pub fn new(id: impl Into<String>, start: RawEventTime, calendar_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: None,
            description: None,
            start,
            end: None,
            status: None,
            calendar_id: calendar_id.into(),
        }
    }

    /// Builder method to set the title.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: RawEventTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Returns true if the provider marked the event cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}
