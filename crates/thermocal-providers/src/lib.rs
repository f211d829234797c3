//! Provider traits, Google implementation, credentials and token cache.
//!
//! - [`OAuthProvider`] / [`CalendarProvider`] - the seams the authorization
//!   flow talks to
//! - [`ClientConfig`] - the application's OAuth client registration
//! - [`Credential`] / [`TokenCache`] - obtained access and where it lives
//! - [`RawEvent`] and [`normalize_events`] - provider events to schedule entries
//!
//! # Architecture
//!
//! ```text
//!   client_secret.json ──► ClientConfig
//!                              │
//!                              ▼
//!   code ──────────────► OAuthProvider::exchange_code ──► Credential ──► TokenCache
//!                                                             │
//!                                                             ▼
//!                          CalendarProvider::fetch_events ──► RawEvent
//!                                                             │
//!                                                             ▼ normalize_events()
//!                                                      ScheduleEntry
//! ```

pub mod credentials;
pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod normalize;
pub mod provider;
pub mod raw_event;
pub mod tokens;

pub use credentials::{ClientConfig, ClientConfigSource, CredentialsFile};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{
    BoxFuture, CalendarProvider, FetchOptions, OAuthProvider,
    DEFAULT_MAX_RESULTS, PRIMARY_CALENDAR,
};
pub use raw_event::{RawEvent, RawEventTime};
pub use tokens::{Credential, FileTokenCache, MemoryTokenCache, TokenCache};
