//! Command-line interface definition.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thermocal_core::{TracingConfig, TracingError, TracingOutputFormat};

use crate::config::{DEFAULT_CLIENT_SECRET_PATH, DEFAULT_PORT, DEFAULT_USER_ID, ServerConfig};

/// thermocal - calendar-driven thermostat schedule over HTTP
#[derive(Debug, Parser)]
#[command(name = "thermocal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to listen on
    #[arg(long, env = "THERMOCAL_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Path to the OAuth client credentials JSON
    #[arg(long, env = "THERMOCAL_CLIENT_SECRET", default_value = DEFAULT_CLIENT_SECRET_PATH)]
    pub client_secret: PathBuf,

    /// User identity credentials are cached under
    #[arg(long, env = "THERMOCAL_USER", default_value = DEFAULT_USER_ID)]
    pub user: String,

    /// Keep obtained tokens in this file across restarts
    #[arg(long, env = "THERMOCAL_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Timeout in seconds for calls to the calendar provider
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Log output format: pretty, compact or json
    #[arg(long, default_value = "compact")]
    pub log_format: String,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

impl Cli {
    /// Server settings from the parsed flags.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_bind_address(self.bind)
            .with_port(self.port)
            .with_client_secret_path(&self.client_secret)
            .with_user_id(&self.user)
            .with_provider_timeout(Duration::from_secs(self.timeout))
            .with_token_file(self.token_file.clone())
    }

    /// Tracing settings from `--log-format` and `--debug`.
    pub fn tracing_config(&self) -> Result<TracingConfig, TracingError> {
        let format: TracingOutputFormat = self.log_format.parse()?;
        let base = if self.debug {
            TracingConfig::debug()
        } else {
            TracingConfig::server()
        };
        Ok(base.with_format(format))
    }
}
