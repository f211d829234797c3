//! Normalized schedule entries.
//!
//! A [`ScheduleEntry`] is the service's output record for one timed calendar
//! event. It is derived on every query and never stored.

use serde::{Deserialize, Serialize};

/// A normalized, timed calendar event.
///
/// Serializes to the wire shape
/// `{"start", "end", "name", "desiredTemperature"}`; absent optional fields
/// are omitted. `start` and `end` hold the provider's date-time text
/// unchanged, so offsets and fractional seconds survive as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Start instant, as the provider reported it.
    pub start: String,
    /// End instant, absent when the provider did not report a timed end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// The event title.
    pub name: String,
    /// Thermostat hint parsed from the event description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_temperature: Option<i64>,
}

impl ScheduleEntry {
    /// Creates a new entry with no end and no desired temperature.
    pub fn new(start: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
            name: name.into(),
            desired_temperature: None,
        }
    }

    /// Builder method to set the end instant.
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Builder method to set the desired temperature.
    pub fn with_desired_temperature(mut self, temperature: Option<i64>) -> Self {
        self.desired_temperature = temperature;
        self
    }
}
