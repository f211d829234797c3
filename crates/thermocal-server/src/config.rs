//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thermocal_providers::google::GoogleConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default path of the OAuth client credentials file.
pub const DEFAULT_CLIENT_SECRET_PATH: &str = "client_secret.json";

/// The single user identity credentials are cached under.
pub const DEFAULT_USER_ID: &str = "username";

/// OAuth scope for read-only calendar access.
pub const CALENDAR_READONLY_SCOPE: &str = GoogleConfig::DEFAULT_SCOPE;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_address: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Path to the OAuth client credentials JSON.
    pub client_secret_path: PathBuf,

    /// User identity the token cache is keyed by.
    pub user_id: String,

    /// Upper bound on every outbound provider call.
    pub provider_timeout: Duration,

    /// Mirror the token cache to this file. Memory-only when unset.
    pub token_file: Option<PathBuf>,

    /// OAuth scopes requested at consent.
    pub scopes: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            client_secret_path: PathBuf::from(DEFAULT_CLIENT_SECRET_PATH),
            user_id: DEFAULT_USER_ID.to_string(),
            provider_timeout: Duration::from_secs(30),
            token_file: None,
            scopes: vec![CALENDAR_READONLY_SCOPE.to_string()],
        }
    }
}

impl ServerConfig {
    /// Builder: set listen address.
    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Builder: set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: set credentials file path.
    pub fn with_client_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_secret_path = path.into();
        self
    }

    /// Builder: set user identity.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Builder: set provider call timeout.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Builder: set token file.
    pub fn with_token_file(mut self, path: Option<PathBuf>) -> Self {
        self.token_file = path;
        self
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}
