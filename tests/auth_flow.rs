#![allow(clippy::unwrap_used)]

mod common;

use anyhow::Result;
use catalog_admin::{
    ClientError,
    auth::{sign_in, sign_up},
    session::{FileTokenStorage, SessionStore, TokenStorage, same_token},
};
use common::{admin, auth_client, can_bind_localhost, secret, signed_in_session};
use secrecy::ExposeSecret;
use serde_json::json;
use std::{io, sync::Arc};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_payload(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "user": { "id": "1", "username": "admin" },
        "accessToken": access_token,
        "refreshToken": refresh_token
    })
}

#[tokio::test]
async fn login_establishes_and_persists_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_payload("a1", "r1")))
        .expect(1)
        .mount(&server)
        .await;

    let state_dir = tempfile::tempdir()?;
    let session = SessionStore::new(Arc::new(FileTokenStorage::new(state_dir.path())));
    let user = sign_in(&auth_client(&server), &session, "admin", &secret("hunter2")).await?;

    assert_eq!(user, admin());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.user, Some(admin()));
    assert!(same_token(snapshot.access_token.as_ref(), Some("a1")));
    assert!(same_token(snapshot.refresh_token.as_ref(), Some("r1")));

    // A new process only sees the refresh token.
    let restarted = SessionStore::new(Arc::new(FileTokenStorage::new(state_dir.path())));
    assert!(restarted.has_refresh_token_only());
    assert_eq!(restarted.refresh_token().unwrap().expose_secret(), "r1");
    Ok(())
}

#[tokio::test]
async fn rejected_login_leaves_session_unchanged() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session("a0", "r0");
    let err = sign_in(&auth_client(&server), &session, "admin", &secret("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Auth { status: 401, .. }));
    assert!(err.to_string().contains("Invalid credentials"));
    assert!(same_token(session.access_token().as_ref(), Some("a0")));
    assert!(same_token(session.refresh_token().as_ref(), Some("r0")));
    Ok(())
}

#[tokio::test]
async fn register_replaces_existing_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({ "username": "admin", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_payload("a9", "r9")))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session("a0", "r0");
    sign_up(&auth_client(&server), &session, "admin", &secret("s3cret")).await?;

    assert!(same_token(session.access_token().as_ref(), Some("a9")));
    assert_eq!(
        session.persisted_refresh_token().unwrap().expose_secret(),
        "r9"
    );
    Ok(())
}

#[tokio::test]
async fn register_conflict_is_an_auth_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("User already exists"))
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    let err = sign_up(&auth_client(&server), &session, "admin", &secret("x"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert!(session.snapshot().is_empty());
    Ok(())
}

#[tokio::test]
async fn refresh_presents_bearer_and_refresh_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(wiremock::matchers::header("authorization", "Bearer a1"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "a2" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session("a1", "r1");
    assert!(session.refresh_access_token(&auth_client(&server)).await);
    assert!(same_token(session.access_token().as_ref(), Some("a2")));
    assert_eq!(session.user(), Some(admin()));
    Ok(())
}

#[tokio::test]
async fn refresh_without_token_makes_no_call() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    assert!(!session.refresh_access_token(&auth_client(&server)).await);
    Ok(())
}

#[tokio::test]
async fn refresh_network_failure_logs_out() -> Result<()> {
    // Nothing listens on the discard port.
    let auth = catalog_admin::auth::AuthClient::with_base_url("http://127.0.0.1:9", common::TIMEOUT)?;
    let session = signed_in_session("a1", "r1");

    assert!(!session.refresh_access_token(&auth).await);
    assert!(session.snapshot().is_empty());
    Ok(())
}

#[tokio::test]
async fn login_during_outage_is_a_server_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session("a0", "r0");
    let err = sign_in(&auth_client(&server), &session, "admin", &secret("hunter2"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Http {
            status: 503,
            message: "maintenance".to_string()
        }
    );
    assert!(err.is_network_or_server());
    assert!(same_token(session.access_token().as_ref(), Some("a0")));
    Ok(())
}

/// Storage whose writes always fail, as on a read-only state directory.
#[derive(Debug)]
struct ReadOnlyStorage;

impl TokenStorage for ReadOnlyStorage {
    fn load(&self) -> io::Result<Option<secrecy::SecretString>> {
        Ok(None)
    }

    fn store(&self, _token: &secrecy::SecretString) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn clear(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

#[tokio::test]
async fn login_fails_when_session_can_not_be_stored() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_payload("a1", "r1")))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::new(Arc::new(ReadOnlyStorage));
    let err = sign_in(&auth_client(&server), &session, "admin", &secret("hunter2"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Storage(_)));
    assert!(session.snapshot().is_empty());
    Ok(())
}
