use crate::{
    auth::AuthClient,
    router::routes::{HOME_ROUTE, LOGIN_ROUTE, RouteMeta},
    session::SessionStore,
};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Proceed,
    Redirect(String),
}

/// Pre-navigation check. UX-only: real access control lives on the API.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: SessionStore,
    auth: AuthClient,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionStore, auth: AuthClient) -> Self {
        Self { session, auth }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Decides whether a navigation to a route with `meta` may proceed.
    ///
    /// A protected destination reached with only a refresh token (a fresh
    /// start) suspends on a silent refresh first.
    pub async fn evaluate(&self, meta: &RouteMeta) -> NavigationOutcome {
        if meta.requires_auth && !self.session.is_authenticated() {
            if self.session.has_refresh_token_only() {
                debug!("attempting silent refresh before navigation");
                if self.session.refresh_access_token(&self.auth).await {
                    return NavigationOutcome::Proceed;
                }
            }
            return NavigationOutcome::Redirect(LOGIN_ROUTE.to_string());
        }

        if meta.guest && self.session.is_authenticated() {
            return NavigationOutcome::Redirect(HOME_ROUTE.to_string());
        }

        NavigationOutcome::Proceed
    }
}
