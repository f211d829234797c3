//! RawEvent to ScheduleEntry conversion.
//!
//! Only timed events become schedule entries; all-day events (date-only
//! start) are dropped. Input order is preserved.

use thermocal_core::{ScheduleEntry, extract_desired_temperature};
use tracing::trace;

use crate::raw_event::{RawEvent, RawEventTime};

/// Converts a [`RawEvent`] to a [`ScheduleEntry`].
///
/// Returns `None` for events without a definite start instant. The desired
/// temperature is parsed from the description; a missing or malformed marker
/// leaves it absent.
pub fn normalize_event(raw: &RawEvent) -> Option<ScheduleEntry> {
    let Some(start) = raw.start.date_time() else {
        trace!(event = %raw.id, "skipping all-day event");
        return None;
    };

    let mut entry = ScheduleEntry::new(start.to_string(), raw.summary.clone().unwrap_or_default())
        .with_desired_temperature(
            raw.description
                .as_deref()
                .and_then(extract_desired_temperature),
        );

    if let Some(end) = raw.end.as_ref().and_then(RawEventTime::date_time) {
        entry = entry.with_end(end);
    }

    Some(entry)
}

/// Normalizes a batch of raw events, keeping provider order.
///
/// Cancelled and all-day events are filtered out.
pub fn normalize_events(raw_events: &[RawEvent]) -> Vec<ScheduleEntry> {
    raw_events
        .iter()
        .filter(|event| !event.is_cancelled())
        .filter_map(normalize_event)
        .collect()
}
