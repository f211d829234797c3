//! HTTP surface.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use thermocal_core::ScheduleEntry;
use tracing::{debug, info, instrument};

use crate::error::{ServerError, ServerResult};
use crate::flow::AuthFlow;
use crate::schedule::ScheduleService;

pub const CONNECT_PATH: &str = "/calendar/connect";
pub const OAUTH_CALLBACK_PATH: &str = "/calendar/oauth";
pub const REQUESTS_PATH: &str = "/calendar/requests";
pub const HEALTH_PATH: &str = "/health";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    flow: Arc<AuthFlow>,
    schedule: Arc<ScheduleService>,
    user_id: Arc<str>,
}

impl AppState {
    pub fn new(flow: AuthFlow, schedule: ScheduleService, user_id: impl Into<Arc<str>>) -> Self {
        Self {
            flow: Arc::new(flow),
            schedule: Arc::new(schedule),
            user_id: user_id.into(),
        }
    }

    pub fn flow(&self) -> &AuthFlow {
        &self.flow
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CONNECT_PATH, get(connect))
        .route(OAUTH_CALLBACK_PATH, get(oauth_callback))
        .route(REQUESTS_PATH, get(requests))
        .route(HEALTH_PATH, get(health))
        .fallback(not_found)
        .with_state(state)
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[instrument(skip_all)]
async fn connect(State(state): State<AppState>) -> ServerResult<Response> {
    let url = state.flow.build_connect_url().await?;
    info!("redirecting to consent page");
    Ok(found(&url))
}

#[derive(Debug, Deserialize)]
struct OAuthCallback {
    code: Option<String>,
    error: Option<String>,
}

/// Finishes consent and always lands on the schedule; without a code or a
/// cached credential that page answers with the connect pointer.
#[instrument(skip_all)]
async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> ServerResult<Response> {
    if let Some(error) = params.error {
        return Err(ServerError::auth_exchange(format!(
            "authorization denied: {}",
            error
        )));
    }

    let code = params.code.as_deref().filter(|c| !c.is_empty());
    if state.flow.resolve_credential(&state.user_id, code).await?.is_none() {
        debug!("callback without code, nothing to exchange");
    }
    Ok(found(REQUESTS_PATH))
}

#[instrument(skip_all)]
async fn requests(State(state): State<AppState>) -> ServerResult<Json<Vec<ScheduleEntry>>> {
    let credential = state
        .flow
        .resolve_credential(&state.user_id, None)
        .await?
        .ok_or(ServerError::NotAuthorized)?;

    let entries = state.schedule.list_upcoming(&credential).await?;
    Ok(Json(entries))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("no route for {}", uri.path()) })),
    )
}
