//! Error taxonomy shared by the auth client, the request pipeline and the
//! resource clients. Messages taken from response bodies are sanitized before
//! they are surfaced so they can be shown to an operator as-is.

use http::StatusCode;
use thiserror::Error;

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The identity service rejected credentials or a refresh token.
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },
    /// A resource request was unauthorized and could not be recovered.
    #[error("Authorization expired ({status}): {message}")]
    AuthorizationExpired { status: u16, message: String },
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Config error: {0}")]
    Config(String),
    /// The token storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Builds the error for a failed response based on its status.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = sanitize_body(body);
        if status == StatusCode::UNAUTHORIZED {
            Self::AuthorizationExpired {
                status: status.as_u16(),
                message,
            }
        } else {
            Self::Http {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Builds an identity service rejection.
    #[must_use]
    pub fn auth(status: StatusCode, body: &str) -> Self {
        Self::Auth {
            status: status.as_u16(),
            message: sanitize_body(body),
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::AuthorizationExpired { status, .. }
            | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::AuthorizationExpired { .. })
    }

    /// True for failures that never touch the session: other statuses and
    /// transport problems.
    #[must_use]
    pub fn is_network_or_server(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Network(_) | Self::Timeout(_)
        )
    }
}

/// Maps transport errors into `ClientError` variants with timeout detection.
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Trims and truncates an error body so it is safe to display.
#[must_use]
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
