//! Core types: schedule entries, temperature extraction, tracing

pub mod schedule;
pub mod temperature;
pub mod tracing;

pub use schedule::ScheduleEntry;
pub use temperature::extract_desired_temperature;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
