//! Client for the identity service endpoints. It owns its own HTTP client and
//! never goes through the authenticated pipeline, so a failing refresh can
//! not trigger another refresh.

use crate::{
    APP_USER_AGENT,
    auth::types::{AuthResponse, CredentialsRequest, RefreshRequest, RefreshResponse},
    config::{AppConfig, CONNECT_TIMEOUT, build_url_with_base},
    errors::{ClientError, sanitize_body},
};
use http::{
    StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const REFRESH_PATH: &str = "/auth/token";

#[derive(Clone, Debug)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Builds a client against the configured API base URL.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.api_base_url, config.timeout)
    }

    /// Builds a client against an explicit base URL.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Exchanges credentials for a session.
    ///
    /// # Errors
    /// Returns `ClientError::Auth` when the service rejects the credentials, or a
    /// transport/parse error otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ClientError> {
        let body = CredentialsRequest {
            username,
            password: password.expose_secret(),
        };
        self.post(LOGIN_PATH, &body, None).await
    }

    /// Creates an account and returns its first session.
    ///
    /// # Errors
    /// Returns `ClientError::Auth` on conflict or validation failure.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ClientError> {
        let body = CredentialsRequest {
            username,
            password: password.expose_secret(),
        };
        self.post(REGISTER_PATH, &body, None).await
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The current access token, even an expired one, is sent as a bearer
    /// credential because the identity service expects it on this endpoint.
    ///
    /// # Errors
    /// Returns `ClientError::Auth` when the refresh token is invalid, expired or revoked.
    #[instrument(skip_all)]
    pub async fn refresh(
        &self,
        refresh_token: &SecretString,
        access_token: Option<&SecretString>,
    ) -> Result<RefreshResponse, ClientError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        self.post(REFRESH_PATH, &body, access_token).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, ClientError> {
        let url = build_url_with_base(&self.base_url, path);
        debug!("auth request: POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(body);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let span = info_span!("auth.request", http.method = "POST", url = %url);
        let response = request.send().instrument(span).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(rejection(status, &text));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
    }
}

/// Credential and token rejections become `Auth`; outages and unexpected
/// statuses keep their `Http` classification.
fn rejection(status: StatusCode, body: &str) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => ClientError::auth(status, body),
        _ => ClientError::Http {
            status: status.as_u16(),
            message: sanitize_body(body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::rejection;
    use crate::errors::ClientError;
    use http::StatusCode;

    #[test]
    fn rejection_statuses_are_auth_errors() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::CONFLICT,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            let err = rejection(status, "nope");
            assert!(matches!(err, ClientError::Auth { .. }), "{status}");
            assert!(!err.is_network_or_server());
        }
    }

    #[test]
    fn outages_stay_http_errors() {
        for status in [
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = rejection(status, "maintenance");
            assert_eq!(
                err,
                ClientError::Http {
                    status: status.as_u16(),
                    message: "maintenance".to_string()
                }
            );
            assert!(err.is_network_or_server());
        }
    }
}
