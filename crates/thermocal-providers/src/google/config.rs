//! Google provider configuration.

use std::time::Duration;

/// Google OAuth consent page.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google OAuth token endpoint.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The three Google endpoints the provider talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    /// Consent page users are redirected to.
    pub auth_url: String,
    /// Token endpoint for code exchange.
    pub token_url: String,
    /// Calendar API v3 base URL.
    pub calendar_api_base: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            calendar_api_base: CALENDAR_API_BASE.to_string(),
        }
    }
}

impl GoogleEndpoints {
    /// Points every endpoint at one base URL.
    ///
    /// The consent page becomes `{base}/o/oauth2/v2/auth`, the token endpoint
    /// `{base}/token` and the Calendar API `{base}/calendar/v3`. Used to
    /// target a local stand-in for Google.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_url: format!("{}/o/oauth2/v2/auth", base),
            token_url: format!("{}/token", base),
            calendar_api_base: format!("{}/calendar/v3", base),
        }
    }
}

/// Configuration for the Google provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Endpoints to use.
    pub endpoints: GoogleEndpoints,

    /// Per-request timeout for token and API calls.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoints: GoogleEndpoints::default(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("thermocal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// OAuth scope for read-only calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.readonly";

    /// Sets the endpoints.
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
