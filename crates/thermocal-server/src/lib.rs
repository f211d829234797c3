//! HTTP service: OAuth authorization flow and upcoming schedule.
//!
//! Routes:
//! - `GET /calendar/connect` - redirect to the provider consent page
//! - `GET /calendar/oauth?code=...` - exchange the code, redirect to requests
//! - `GET /calendar/requests` - upcoming schedule as JSON
//! - `GET /health` - liveness check
//!
//! # Example
//!
//! ```rust,no_run
//! use thermocal_server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), thermocal_server::ServerError> {
//!     thermocal_server::run(ServerConfig::default().with_port(8080)).await
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod routes;
pub mod schedule;
#[cfg(test)]
mod testing;

pub use app::{build_state, run, serve, shutdown_signal};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use flow::AuthFlow;
pub use routes::{AppState, router};
pub use schedule::ScheduleService;
