use crate::{
    auth,
    cli::{
        actions::{Context, print_json},
        globals::GlobalArgs,
    },
    router::{LOGIN_ROUTE, routes::normalize},
    session::FileTokenStorage,
};
use anyhow::{Context as _, Result, bail};
use secrecy::SecretString;
use serde_json::json;
use std::fmt;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// # Errors
/// Returns an error if the credentials are rejected.
pub async fn login(context: &Context, credentials: Credentials) -> Result<()> {
    let user = auth::sign_in(
        &context.auth,
        &context.session,
        &credentials.username,
        &credentials.password,
    )
    .await?;
    print_json(&json!({ "user": user }))
}

/// # Errors
/// Returns an error if registration is rejected.
pub async fn register(context: &Context, credentials: Credentials) -> Result<()> {
    let user = auth::sign_up(
        &context.auth,
        &context.session,
        &credentials.username,
        &credentials.password,
    )
    .await?;
    print_json(&json!({ "user": user }))
}

/// # Errors
/// Returns an error if the stored refresh token can not be removed.
pub fn logout(context: &Context) -> Result<()> {
    context
        .session
        .logout()
        .context("failed to remove the stored refresh token")?;
    print_json(&json!({ "signedOut": true }))
}

/// Reports the session without exposing any token.
/// # Errors
/// Returns an error if the output can not be written.
pub fn status(context: &Context, globals: &GlobalArgs) -> Result<()> {
    let session = context.session.snapshot();
    let storage = FileTokenStorage::new(&globals.config.state_dir);
    print_json(&json!({
        "authenticated": session.is_authenticated(),
        "user": session.user,
        "hasRefreshToken": session.refresh_token.is_some(),
        "tokenFile": storage.path().display().to_string(),
        "apiBaseUrl": globals.config.api_base_url,
    }))
}

/// # Errors
/// Returns an error if no refresh token is held or the server rejects it.
pub async fn refresh(context: &Context) -> Result<()> {
    if context.session.refresh_token().is_none() {
        bail!("not signed in, run `catalog-admin login` first");
    }
    if !context.session.refresh_access_token(&context.auth).await {
        bail!("session expired, run `catalog-admin login` again");
    }
    print_json(&json!({
        "refreshed": true,
        "user": context.session.user(),
    }))
}

/// Runs a navigation through the route guard and reports where it settled.
/// # Errors
/// Returns an error if the output can not be written.
pub async fn navigate(context: &Context, path: &str) -> Result<()> {
    let location = context.router.push(path).await;
    print_json(&json!({
        "requested": path,
        "path": location.path,
        "route": location.name,
        "redirected": location.path != normalize(path),
        "signInRequired": location.path == LOGIN_ROUTE && !context.session.is_authenticated(),
    }))
}
