//! Authenticated request pipeline.
//!
//! `Authenticated` decorates a base `Transport`: it attaches the current access
//! token as a bearer credential and recovers from a single expired-token
//! failure per logical request.
//!
//! Flow Overview:
//! - Attach `Authorization: Bearer <access token>` when one is held; send no
//!   Authorization header otherwise.
//! - On a 401 for a request that has not been retried, mark it retried and, if
//!   a refresh token is held, refresh and re-send once with the new token.
//! - If no refresh token is held or the refresh is rejected, log out, send the
//!   user to the login route and return the original 401.
//! - A 401 on the retried request propagates without a second refresh.
//!
//! A 401 never comes back from this transport as `Ok`: it is always turned into
//! `ClientError::AuthorizationExpired`. Other statuses are returned untouched.

use crate::{
    api::transport::{ApiRequest, ApiResponse, Transport},
    auth::AuthClient,
    errors::ClientError,
    router::{LOGIN_ROUTE, Navigator},
    session::SessionStore,
};
use http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct Authenticated<T> {
    inner: T,
    session: SessionStore,
    auth: AuthClient,
    navigator: Arc<dyn Navigator>,
}

impl<T: Transport> Authenticated<T> {
    pub fn new(
        inner: T,
        session: SessionStore,
        auth: AuthClient,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner,
            session,
            auth,
            navigator,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Copies the request with exactly one Authorization header derived from
    /// the session, or none when no access token is held.
    fn authorize(&self, request: &ApiRequest) -> Result<ApiRequest, ClientError> {
        let mut outbound = request.clone();
        outbound.headers.remove(AUTHORIZATION);

        if let Some(token) = self.session.access_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| {
                    ClientError::Serialization("Access token is not a valid header value".into())
                })?;
            value.set_sensitive(true);
            outbound.headers.insert(AUTHORIZATION, value);
        }

        Ok(outbound)
    }

    /// Ends the session after an unrecoverable 401 and returns the error to surface.
    fn force_logout(&self, response: &ApiResponse) -> ClientError {
        warn!(url = %response.url, "authorization could not be recovered, logging out");
        self.session.clear_after_failure();
        self.navigator.navigate(LOGIN_ROUTE);
        unauthorized(response)
    }
}

impl<T: Transport> Transport for Authenticated<T> {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut pending = request.clone();

        let response = self.inner.send(&self.authorize(&pending)?).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        if !pending.mark_retried() {
            debug!("request already retried once, not refreshing again");
            return Err(unauthorized(&response));
        }

        if self.session.refresh_token().is_none() {
            return Err(self.force_logout(&response));
        }

        // A rejected refresh already clears the session.
        if !self.session.refresh_access_token(&self.auth).await {
            warn!("token refresh rejected, redirecting to login");
            self.navigator.navigate(LOGIN_ROUTE);
            return Err(unauthorized(&response));
        }

        debug!("retrying request with refreshed access token");
        let retried = self.inner.send(&self.authorize(&pending)?).await?;
        if retried.status == StatusCode::UNAUTHORIZED {
            return Err(unauthorized(&retried));
        }
        Ok(retried)
    }
}

fn unauthorized(response: &ApiResponse) -> ClientError {
    ClientError::from_status(StatusCode::UNAUTHORIZED, &response.text())
}
