//! Authentication against the identity service: login, registration and
//! token refresh, plus the helpers that fold a successful result into the
//! session. This module handles credentials and tokens and must never log them.
//!
//! Flow Overview: login and registration return a full session (user, access
//! token, refresh token) which replaces the current one. Refresh returns a new
//! access token and, optionally, a rotated refresh token; the session store
//! applies it. A failed login or registration leaves the session untouched.

pub mod client;
pub mod types;

pub use client::AuthClient;
pub use types::{AuthResponse, RefreshResponse, UserIdentity};

use crate::{errors::ClientError, session::SessionStore};
use secrecy::SecretString;
use tracing::{info, instrument};

/// Logs in and replaces the session on success.
///
/// # Errors
/// Returns `ClientError::Auth` on rejected credentials, `Http`/`Network` when
/// the identity service is unavailable, or `Storage` when the session cannot be
/// persisted. The session is left unchanged in every case.
#[instrument(skip(auth, session, password))]
pub async fn sign_in(
    auth: &AuthClient,
    session: &SessionStore,
    username: &str,
    password: &SecretString,
) -> Result<UserIdentity, ClientError> {
    let response = auth.login(username, password).await?;
    establish(session, response)
}

/// Registers and replaces the session on success.
///
/// # Errors
/// Returns `ClientError::Auth` on conflict or validation failure; see
/// [`sign_in`] for the other cases. The session is left unchanged.
#[instrument(skip(auth, session, password))]
pub async fn sign_up(
    auth: &AuthClient,
    session: &SessionStore,
    username: &str,
    password: &SecretString,
) -> Result<UserIdentity, ClientError> {
    let response = auth.register(username, password).await?;
    establish(session, response)
}

fn establish(session: &SessionStore, response: AuthResponse) -> Result<UserIdentity, ClientError> {
    let AuthResponse {
        user,
        access_token,
        refresh_token,
    } = response;
    session.set_session(
        user.clone(),
        SecretString::from(access_token),
        SecretString::from(refresh_token),
    )?;
    info!(user_id = %user.id, "session established");
    Ok(user)
}
