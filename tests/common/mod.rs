#![allow(dead_code, clippy::unwrap_used)]

use catalog_admin::{
    api::{ApiClient, Authenticated, HttpTransport},
    auth::{AuthClient, UserIdentity},
    router::Navigator,
    session::{MemoryTokenStorage, SessionStore},
};
use secrecy::SecretString;
use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};
use wiremock::MockServer;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Navigator that remembers every forced navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

pub fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

pub fn admin() -> UserIdentity {
    UserIdentity {
        id: "1".to_string(),
        username: "admin".to_string(),
    }
}

pub fn auth_client(server: &MockServer) -> AuthClient {
    AuthClient::with_base_url(&server.uri(), TIMEOUT).unwrap()
}

/// Session holding only a persisted refresh token, as after a restart.
pub fn restarted_session(refresh_token: &str) -> SessionStore {
    SessionStore::new(Arc::new(MemoryTokenStorage::with_token(refresh_token)))
}

/// Session signed in with the given tokens.
pub fn signed_in_session(access_token: &str, refresh_token: &str) -> SessionStore {
    let session = SessionStore::in_memory();
    session
        .set_session(admin(), secret(access_token), secret(refresh_token))
        .unwrap();
    session
}

pub struct Harness {
    pub api: ApiClient,
    pub session: SessionStore,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(server: &MockServer, session: SessionStore) -> Harness {
    let navigator = Arc::new(RecordingNavigator::default());
    let transport = HttpTransport::with_base_url(&server.uri(), TIMEOUT).unwrap();
    let pipeline = Authenticated::new(
        transport,
        session.clone(),
        auth_client(server),
        navigator.clone(),
    );
    Harness {
        api: ApiClient::from_pipeline(pipeline, "https://media.test"),
        session,
        navigator,
    }
}
