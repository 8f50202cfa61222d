//! Session state shared by the request pipeline and the route guard.
//!
//! `SessionStore` is the single source of truth for who is signed in. It is a
//! cheap handle around shared state and is passed explicitly to the
//! collaborators that need it. The access token only lives in memory; the
//! refresh token is mirrored to a `TokenStorage` so it survives restarts.
//!
//! Every mutation holds the session lock across both the storage write and the
//! in-memory update, so the persisted refresh token and the in-memory one never
//! diverge once a call returns. Storage is written first: when it fails the
//! in-memory refresh token is left as it was and the error is returned.

pub mod storage;

use crate::{
    auth::{AuthClient, types::RefreshResponse, types::UserIdentity},
    errors::ClientError,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

/// Point-in-time copy of the session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub user: Option<UserIdentity>,
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    #[must_use]
    pub fn has_refresh_token_only(&self) -> bool {
        self.refresh_token.is_some() && self.access_token.is_none()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.access_token.is_none() && self.refresh_token.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// Builds a store and rehydrates the refresh token from `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let refresh_token = match storage.load() {
            Ok(token) => token,
            Err(err) => {
                warn!("Failed to load persisted refresh token: {err}");
                None
            }
        };
        debug!(
            rehydrated = refresh_token.is_some(),
            "session store initialized"
        );

        Self {
            state: Arc::new(RwLock::new(Session {
                refresh_token,
                ..Session::default()
            })),
            storage,
        }
    }

    /// Store backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStorage::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, token: &SecretString) -> Result<(), ClientError> {
        self.storage.store(token).map_err(|err| {
            warn!("Failed to persist refresh token: {err}");
            ClientError::from(err)
        })
    }

    /// Overwrites user, access token and refresh token, persisting the refresh token.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if the refresh token cannot be persisted;
    /// the session is left unchanged.
    pub fn set_session(
        &self,
        user: UserIdentity,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), ClientError> {
        let mut session = self.write();
        self.persist(&refresh_token)?;
        session.user = Some(user);
        session.access_token = Some(access_token);
        session.refresh_token = Some(refresh_token);
        Ok(())
    }

    /// Overwrites only the in-memory access token.
    pub fn set_access_token(&self, token: SecretString) {
        self.write().access_token = Some(token);
    }

    /// Replaces the refresh token after the server rotated it.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if the token cannot be persisted; the
    /// previous refresh token is kept.
    pub fn set_refresh_token(&self, token: SecretString) -> Result<(), ClientError> {
        let mut session = self.write();
        self.persist(&token)?;
        session.refresh_token = Some(token);
        Ok(())
    }

    /// Applies a successful refresh: the access token always, the refresh
    /// token only when rotated, and the user only when returned.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if a rotated refresh token cannot be
    /// persisted; the access token and user are still applied.
    pub fn apply_refresh(&self, response: RefreshResponse) -> Result<(), ClientError> {
        let mut session = self.write();
        session.access_token = Some(SecretString::from(response.access_token));
        if let Some(user) = response.user {
            session.user = Some(user);
        }
        if let Some(rotated) = response.refresh_token {
            let rotated = SecretString::from(rotated);
            self.persist(&rotated)?;
            session.refresh_token = Some(rotated);
        }
        Ok(())
    }

    /// Clears the session and the persisted refresh token. Idempotent.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if the persisted token cannot be removed.
    /// User and access token are dropped regardless; the in-memory refresh
    /// token is kept so it still matches storage.
    pub fn logout(&self) -> Result<(), ClientError> {
        let mut session = self.write();
        session.user = None;
        session.access_token = None;
        if let Err(err) = self.storage.clear() {
            warn!("Failed to remove persisted refresh token: {err}");
            return Err(err.into());
        }
        session.refresh_token = None;
        Ok(())
    }

    /// Logs out after an unrecoverable failure. A storage error is already
    /// logged by `logout` and leaves only the refresh token behind.
    pub(crate) fn clear_after_failure(&self) {
        let _ = self.logout();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    #[must_use]
    pub fn has_refresh_token_only(&self) -> bool {
        self.read().has_refresh_token_only()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read().access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read().refresh_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserIdentity> {
        self.read().user.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Reads the refresh token currently held by the backing storage.
    #[must_use]
    pub fn persisted_refresh_token(&self) -> Option<SecretString> {
        self.storage.load().ok().flatten()
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Returns `false` without any network call when no refresh token is held.
    /// A rejected refresh logs the session out before returning `false`.
    #[instrument(skip_all)]
    pub async fn refresh_access_token(&self, auth: &AuthClient) -> bool {
        let (refresh_token, access_token) = {
            let session = self.read();
            (session.refresh_token.clone(), session.access_token.clone())
        };
        let Some(refresh_token) = refresh_token else {
            debug!("no refresh token held, skipping refresh");
            return false;
        };

        match auth.refresh(&refresh_token, access_token.as_ref()).await {
            Ok(response) => {
                let rotated = response.refresh_token.is_some();
                if let Err(err) = self.apply_refresh(response) {
                    warn!("Refreshed session could not be stored, clearing session: {err}");
                    self.clear_after_failure();
                    return false;
                }
                info!(rotated, "access token refreshed");
                true
            }
            Err(err) => {
                warn!("Token refresh failed, clearing session: {err}");
                self.clear_after_failure();
                false
            }
        }
    }
}

/// Equality on exposed token values, used where callers need to compare sessions.
#[must_use]
pub fn same_token(left: Option<&SecretString>, right: Option<&str>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left.expose_secret() == right,
        (None, None) => true,
        _ => false,
    }
}
