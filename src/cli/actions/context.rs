use crate::{
    api::ApiClient,
    auth::AuthClient,
    config::AppConfig,
    router::{Navigator, Router},
    session::{FileTokenStorage, SessionStore},
};
use anyhow::{Context as _, Result};
use std::sync::Arc;
use tracing::debug;

/// Collaborators shared by the online actions, all wired to one session.
pub struct Context {
    pub session: SessionStore,
    pub auth: AuthClient,
    pub router: Arc<Router>,
    pub api: ApiClient,
}

impl Context {
    /// # Errors
    /// Returns an error if the configuration is invalid or a client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let storage = FileTokenStorage::new(&config.state_dir);
        debug!(path = %storage.path().display(), "using token storage");
        let session = SessionStore::new(Arc::new(storage));

        let auth = AuthClient::new(config).context("failed to build auth client")?;
        let router = Arc::new(Router::new(session.clone(), auth.clone()));
        let navigator: Arc<dyn Navigator> = router.clone();
        let api = ApiClient::new(config, session.clone(), navigator)
            .context("failed to build API client")?;

        Ok(Self {
            session,
            auth,
            router,
            api,
        })
    }

    /// Restores an access token from the persisted refresh token, if one is
    /// held, before the first API call of this process.
    pub async fn resume(&self) {
        if self.session.has_refresh_token_only() {
            self.session.refresh_access_token(&self.auth).await;
        }
    }
}
