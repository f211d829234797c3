//! Desired-temperature extraction from free-text event descriptions.
//!
//! Event organizers embed a thermostat hint in the description using the
//! `temp=<digits>` convention (case-insensitive), e.g.
//! `"Board meeting, temp=72 please"`.
//!
//! # Example
//!
//! ```
//! use thermocal_core::extract_desired_temperature;
//!
//! assert_eq!(extract_desired_temperature("meeting, temp=72 please"), Some(72));
//! assert_eq!(extract_desired_temperature("no temp info"), None);
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Regex for the `temp=<digits>` marker.
static TEMPERATURE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)temp=([0-9]+)").expect("Invalid temperature regex"));

/// Extracts the desired temperature from an event description.
///
/// Only the first `temp=<digits>` marker is considered. Returns `None` when
/// there is no marker or when the digit run does not fit in an `i64`; a
/// malformed description never fails the caller.
pub fn extract_desired_temperature(description: &str) -> Option<i64> {
    let captures = TEMPERATURE_REGEX.captures(description)?;
    captures.get(1)?.as_str().parse().ok()
}
