//! End-to-end flow against a local stand-in for Google's endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use thermocal_providers::google::{GoogleConfig, GoogleEndpoints, GoogleProvider};
use thermocal_providers::{CredentialsFile, FileTokenCache, TokenCache};
use thermocal_server::{AppState, AuthFlow, ScheduleService, router};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

struct Deployment {
    app: Router,
    cache: Arc<FileTokenCache>,
    _dir: tempfile::TempDir,
}

fn deploy(google: &MockServer, credentials: Option<&str>) -> Deployment {
    let dir = tempfile::tempdir().unwrap();
    let secret_path = dir.path().join("client_secret.json");
    if let Some(json) = credentials {
        std::fs::write(&secret_path, json).unwrap();
    }

    let provider = Arc::new(
        GoogleProvider::new(
            GoogleConfig::default()
                .with_endpoints(GoogleEndpoints::with_base(&google.uri()))
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap(),
    );
    let cache = Arc::new(FileTokenCache::open(dir.path().join("tokens.json")).unwrap());

    let flow = AuthFlow::new(
        Arc::new(CredentialsFile::new(secret_path)),
        provider.clone(),
        cache.clone(),
        vec![SCOPE.to_string()],
        Duration::from_secs(5),
    );
    let schedule = ScheduleService::new(provider, Duration::from_secs(5));

    Deployment {
        app: router(AppState::new(flow, schedule, "username")),
        cache,
        _dir: dir,
    }
}

const CLIENT_SECRET: &str = r#"{
    "web": {
        "client_id": "thermocal-test.apps.googleusercontent.com",
        "client_secret": "test-secret",
        "redirect_uris": ["http://localhost:4000/calendar/oauth"]
    }
}"#;

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn connect_exchange_and_list() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.integration",
            "refresh_token": "1//refresh",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": SCOPE
        })))
        .expect(1)
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(header_eq("Authorization", "Bearer ya29.integration"))
        .and(query_param("maxResults", "20"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "standup",
                    "summary": "Standup",
                    "description": "temp=68",
                    "start": {"dateTime": "2024-03-15T09:00:00-07:00"},
                    "end": {"dateTime": "2024-03-15T09:30:00-07:00"}
                },
                {
                    "id": "offsite",
                    "summary": "Offsite",
                    "start": {"date": "2024-03-16"},
                    "end": {"date": "2024-03-17"}
                },
                {
                    "id": "review",
                    "summary": "Review",
                    "description": "Temp=64, bring slides",
                    "start": {"dateTime": "2024-03-15T21:00:00.000Z"},
                    "end": {"dateTime": "2024-03-15T22:00:00.000Z"}
                }
            ]
        })))
        .expect(2)
        .mount(&google)
        .await;

    let deployment = deploy(&google, Some(CLIENT_SECRET));

    let response = get(&deployment.app, "/calendar/connect").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let consent = url::Url::parse(
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(consent.path(), "/o/oauth2/v2/auth");
    let query: std::collections::HashMap<_, _> = consent.query_pairs().into_owned().collect();
    assert_eq!(query["access_type"], "offline");
    assert_eq!(query["response_type"], "code");
    assert_eq!(query["scope"], SCOPE);
    assert_eq!(query["client_id"], "thermocal-test.apps.googleusercontent.com");
    assert_eq!(query["redirect_uri"], "http://localhost:4000/calendar/oauth");

    let response = get(&deployment.app, "/calendar/oauth?code=abc").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/calendar/requests"
    );

    let cached = deployment.cache.get("username").unwrap();
    assert_eq!(cached.access_token, "ya29.integration");

    for _ in 0..2 {
        let response = get(&deployment.app, "/calendar/requests").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([
                {
                    "start": "2024-03-15T09:00:00-07:00",
                    "end": "2024-03-15T09:30:00-07:00",
                    "name": "Standup",
                    "desiredTemperature": 68
                },
                {
                    "start": "2024-03-15T21:00:00.000Z",
                    "end": "2024-03-15T22:00:00.000Z",
                    "name": "Review",
                    "desiredTemperature": 64
                }
            ])
        );
    }
}

#[tokio::test]
async fn exchanged_token_survives_restart() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.durable",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&google)
        .await;

    let deployment = deploy(&google, Some(CLIENT_SECRET));
    let response = get(&deployment.app, "/calendar/oauth?code=abc").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let reopened = FileTokenCache::open(deployment.cache.path()).unwrap();
    assert_eq!(reopened.get("username").unwrap().access_token, "ya29.durable");
}

#[tokio::test]
async fn rejected_code_is_unauthorized() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&google)
        .await;

    let deployment = deploy(&google, Some(CLIENT_SECRET));

    let response = get(&deployment.app, "/calendar/oauth?code=expired").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("invalid_grant"));
    assert!(deployment.cache.get("username").is_none());

    let response = get(&deployment.app, "/calendar/requests").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/calendar/connect"
    );
}

#[tokio::test]
async fn revoked_token_is_retrieval_failure() {
    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.revoked"
        })))
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&google)
        .await;

    let deployment = deploy(&google, Some(CLIENT_SECRET));
    get(&deployment.app, "/calendar/oauth?code=abc").await;

    let response = get(&deployment.app, "/calendar/requests").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "calendar retrieval failed: access token expired or invalid" })
    );
}

#[tokio::test]
async fn missing_credentials_file_is_server_error() {
    let google = MockServer::start().await;
    let deployment = deploy(&google, None);

    for uri in ["/calendar/connect", "/calendar/oauth?code=abc", "/calendar/requests"] {
        let response = get(&deployment.app, uri).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("configuration error:")
        );
    }
    assert!(google.received_requests().await.unwrap().is_empty());
}
