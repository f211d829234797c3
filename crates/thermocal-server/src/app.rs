//! Wiring: from [`ServerConfig`] to a running HTTP server.

use std::future::Future;
use std::sync::Arc;

use thermocal_providers::google::{GoogleConfig, GoogleProvider};
use thermocal_providers::{CredentialsFile, FileTokenCache, MemoryTokenCache, TokenCache};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::flow::AuthFlow;
use crate::routes::{AppState, router};
use crate::schedule::ScheduleService;

/// Builds the application state backed by Google.
///
/// The credentials file is not read here; a missing or broken file only
/// surfaces on the first request that needs it.
pub fn build_state(config: &ServerConfig) -> ServerResult<AppState> {
    let google = Arc::new(
        GoogleProvider::new(GoogleConfig::default().with_timeout(config.provider_timeout))
            .map_err(|e| ServerError::configuration(e.message()))?,
    );

    let cache: Arc<dyn TokenCache> = match &config.token_file {
        Some(path) => {
            info!(path = %path.display(), "token cache mirrored to file");
            Arc::new(FileTokenCache::open(path).map_err(|e| ServerError::configuration(e.message()))?)
        }
        None => Arc::new(MemoryTokenCache::new()),
    };

    let flow = AuthFlow::new(
        Arc::new(CredentialsFile::new(&config.client_secret_path)),
        google.clone(),
        cache,
        config.scopes.clone(),
        config.provider_timeout,
    );
    let schedule = ScheduleService::new(google, config.provider_timeout);

    Ok(AppState::new(flow, schedule, config.user_id.as_str()))
}

/// Serves `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = state.flow().initialize().await {
        warn!(error = %e, "starting without a usable OAuth client configuration");
    }

    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

/// Binds the configured address and serves until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let state = build_state(&config)?;
    let listener = TcpListener::bind(config.socket_addr()).await?;
    serve(listener, state, shutdown_signal()).await
}

/// Resolves when the process receives SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, only Ctrl+C stops the server");
            let _ = tokio::signal::ctrl_c().await;
            info!("Received SIGINT, initiating shutdown");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, initiating shutdown"),
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, initiating shutdown"),
    }
}

/// Resolves on Ctrl+C.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Ok(()) = tokio::signal::ctrl_c().await {
        info!("Received Ctrl+C, initiating shutdown");
    }
}
