//! # catalog-admin
//!
//! Client for administering the catalog REST API (categories, items, styles,
//! landing content, social links and the color theme).
//!
//! ## Authentication
//!
//! The identity service issues a short-lived **access token** and a longer-lived
//! **refresh token**. The access token only lives in memory; the refresh token
//! is persisted so a new process can resume the session.
//!
//! - **Session:** `session::SessionStore` is the single source of truth and is
//!   passed explicitly to everything that reads or mutates it.
//! - **Pipeline:** `api::Authenticated` decorates the base transport, attaches
//!   `Authorization: Bearer <access token>` and performs at most one
//!   refresh-and-retry per request after a `401`.
//! - **Routing:** `router::Router` consults the `RouteGuard` before each
//!   navigation and performs a silent refresh when only a refresh token is held.
//!
//! Tokens are wrapped in `secrecy::SecretString` and must never be logged.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod router;
pub mod session;

pub use errors::ClientError;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
