//! Client-side routing for the admin panel.
//!
//! `Router` resolves a path against the route table, runs the `RouteGuard`
//! before committing, and publishes the committed location on a watch channel.
//! It also implements `Navigator`, which the request pipeline uses to force a
//! redirect to the login route after an unrecoverable authorization failure.

mod guard;
pub mod routes;

pub use guard::{NavigationOutcome, RouteGuard};
pub use routes::{HOME_ROUTE, LOGIN_ROUTE, Route, RouteMeta};

use crate::{auth::AuthClient, session::SessionStore};
use tokio::sync::watch;
use tracing::{debug, info};

/// Upper bound on guard redirects followed for a single navigation.
const MAX_REDIRECTS: usize = 3;

/// Sink for forced navigations.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// A committed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub name: &'static str,
}

impl Location {
    fn of(path: &str) -> Self {
        let route = routes::resolve(path);
        Self {
            path: routes::normalize(path),
            name: route.name,
        }
    }
}

#[derive(Debug)]
pub struct Router {
    guard: RouteGuard,
    location: watch::Sender<Location>,
}

impl Router {
    /// Builds a router parked on the login route.
    #[must_use]
    pub fn new(session: SessionStore, auth: AuthClient) -> Self {
        let (location, _) = watch::channel(Location::of(LOGIN_ROUTE));
        Self {
            guard: RouteGuard::new(session, auth),
            location,
        }
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    #[must_use]
    pub fn current(&self) -> Location {
        self.location.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }

    /// Navigates to `path`, following guard redirects, and returns where the
    /// navigation settled.
    pub async fn push(&self, path: &str) -> Location {
        let mut target = routes::normalize(path);

        for _ in 0..MAX_REDIRECTS {
            let route = routes::resolve(&target);
            match self.guard.evaluate(&route.meta).await {
                NavigationOutcome::Proceed => {
                    return self.commit(&target);
                }
                NavigationOutcome::Redirect(next) => {
                    debug!(from = %target, to = %next, "navigation redirected");
                    target = next;
                }
            }
        }

        // Guard rules can not bounce more than once; settle on login regardless.
        self.commit(LOGIN_ROUTE)
    }

    fn commit(&self, path: &str) -> Location {
        let location = Location::of(path);
        self.location.send_replace(location.clone());
        location
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        info!(to = %path, "forced navigation");
        self.commit(path);
    }
}
