//! Google OAuth 2.0 and Calendar v3 provider.
//!
//! Web-server authorization-code flow:
//!
//! 1. The user is sent to Google's consent page with `access_type=offline`
//!    and the read-only calendar scope
//! 2. Google redirects back to the registered redirect URI with a `code`
//! 3. The code is exchanged at the token endpoint for a [`Credential`]
//! 4. Events are read from `calendars/primary/events` with the bearer token
//!
//! [`Credential`]: crate::Credential
//!
//! # Example
//!
//! ```ignore
//! use thermocal_providers::google::{GoogleConfig, GoogleProvider};
//! use thermocal_providers::{ClientConfig, OAuthProvider};
//!
//! let client = ClientConfig::from_file("client_secret.json").await?;
//! let provider = GoogleProvider::new(GoogleConfig::default())?;
//! let url = provider.authorization_url(&client, &[GoogleConfig::DEFAULT_SCOPE.to_string()]);
//! ```

mod client;
mod config;
mod oauth;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, GoogleEndpoints};
pub use oauth::OAuthClient;
pub use provider::GoogleProvider;
