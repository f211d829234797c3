//! OAuth 2.0 authorization-code flow against Google.

use serde::Deserialize;
use tracing::{debug, info};

use crate::credentials::ClientConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::tokens::Credential;

use super::config::GoogleEndpoints;

/// OAuth client for Google's consent page and token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http_client: reqwest::Client,
    endpoints: GoogleEndpoints,
}

impl OAuthClient {
    /// Creates a new OAuth client sharing the given HTTP client.
    pub fn new(http_client: reqwest::Client, endpoints: GoogleEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    /// Builds the consent URL.
    ///
    /// Requests a code response with offline access so the token endpoint
    /// also returns a refresh token.
    pub fn authorization_url(&self, client: &ClientConfig, scopes: &[String]) -> String {
        let scope = scopes.join(" ");

        format!(
            "{}?access_type=offline&scope={}&response_type=code&client_id={}&redirect_uri={}",
            self.endpoints.auth_url,
            urlencoding::encode(&scope),
            urlencoding::encode(&client.client_id),
            urlencoding::encode(&client.redirect_uri),
        )
    }

    /// Exchanges an authorization code for a credential.
    pub async fn exchange_code(
        &self,
        client: &ClientConfig,
        code: &str,
        scopes: &[String],
    ) -> ProviderResult<Credential> {
        let params = [
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "token exchange timed out".to_string()
                } else {
                    format!("token exchange request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read token response: {}", e)).with_source(e)
        })?;

        if !status.is_success() {
            let reason = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| e.describe())
                .unwrap_or(body);
            debug!(%status, "token endpoint rejected authorization code");
            return Err(ProviderError::authentication(format!(
                "token exchange failed ({}): {}",
                status, reason
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        info!("exchanged authorization code for access token");
        Ok(token.into_credential(scopes))
    }
}

/// Successful response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn into_credential(self, requested: &[String]) -> Credential {
        let scopes = match self.scope {
            Some(granted) => granted.split_whitespace().map(String::from).collect(),
            None => requested.to_vec(),
        };

        Credential::new(self.access_token)
            .with_refresh_token(self.refresh_token)
            .with_token_type(self.token_type)
            .with_scopes(scopes)
            .with_expires_in(self.expires_in)
    }
}

/// Error response from the token endpoint (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenErrorResponse {
    fn describe(self) -> String {
        match self.error_description {
            Some(description) => format!("{} ({})", self.error, description),
            None => self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

    fn client_config() -> ClientConfig {
        ClientConfig::new(
            "test-client.apps.googleusercontent.com",
            "test-secret",
            "http://localhost:4000/calendar/oauth",
        )
    }

    fn oauth_client(base: &str) -> OAuthClient {
        OAuthClient::new(reqwest::Client::new(), GoogleEndpoints::with_base(base))
    }

    #[test]
    fn auth_url_format() {
        let client = OAuthClient::new(reqwest::Client::new(), GoogleEndpoints::default());
        let url = client.authorization_url(&client_config(), &[SCOPE.to_string()]);

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client.apps.googleusercontent.com"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A4000%2Fcalendar%2Foauth"
        ));
        assert!(url.contains(
            "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar.readonly"
        ));
    }

    #[tokio::test]
    async fn exchanges_code_for_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=abc"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_secret=test-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.access",
                "refresh_token": "1//refresh",
                "expires_in": 3599,
                "token_type": "Bearer",
                "scope": SCOPE
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = oauth_client(&server.uri())
            .exchange_code(&client_config(), "abc", &[SCOPE.to_string()])
            .await
            .unwrap();

        assert_eq!(credential.access_token, "ya29.access");
        assert_eq!(credential.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(credential.token_type.as_deref(), Some("Bearer"));
        assert_eq!(credential.scopes, vec![SCOPE.to_string()]);
        assert!(credential.expires_at.is_some());
        assert!(!credential.is_expired());
    }

    #[tokio::test]
    async fn rejected_code_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Malformed auth code."
            })))
            .mount(&server)
            .await;

        let err = oauth_client(&server.uri())
            .exchange_code(&client_config(), "bad", &[])
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert!(err.message().contains("invalid_grant"));
        assert!(err.message().contains("Malformed auth code."));
    }

    #[tokio::test]
    async fn malformed_token_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = oauth_client(&server.uri())
            .exchange_code(&client_config(), "abc", &[])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn missing_scope_falls_back_to_requested() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token"
            })))
            .mount(&server)
            .await;

        let credential = oauth_client(&server.uri())
            .exchange_code(&client_config(), "abc", &[SCOPE.to_string()])
            .await
            .unwrap();
        assert_eq!(credential.scopes, vec![SCOPE.to_string()]);
        assert!(credential.expires_at.is_none());
    }

    #[tokio::test]
    async fn oversized_expires_in_is_accepted_without_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"access_token": "token", "expires_in": 9223372036854775807}"#,
            ))
            .mount(&server)
            .await;

        let credential = oauth_client(&server.uri())
            .exchange_code(&client_config(), "abc", &[])
            .await
            .unwrap();
        assert_eq!(credential.access_token, "token");
        assert!(credential.expires_at.is_none());
    }
}
