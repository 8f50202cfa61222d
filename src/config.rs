//! Client configuration for the catalog API and media endpoints. Compiled
//! defaults can be overridden at build time through `option_env!` and at
//! runtime through `CATALOG_ADMIN_*` environment variables; the CLI applies its
//! own flags on top. Configuration values are public; do not store secrets here.

use crate::errors::ClientError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://ndiuky.site:20000/api";
pub const DEFAULT_MEDIA_BASE_URL: &str = "https://ndiuky.site:20000";
/// Default request timeout applied by every transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_API_URL: &str = "CATALOG_ADMIN_API_URL";
pub const ENV_MEDIA_URL: &str = "CATALOG_ADMIN_MEDIA_URL";
pub const ENV_STATE_DIR: &str = "CATALOG_ADMIN_STATE_DIR";
pub const ENV_TIMEOUT: &str = "CATALOG_ADMIN_TIMEOUT";

/// Client configuration resolved once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub media_base_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("CATALOG_ADMIN_API_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            media_base_url: option_env!("CATALOG_ADMIN_MEDIA_URL")
                .unwrap_or(DEFAULT_MEDIA_BASE_URL)
                .to_string(),
            state_dir: default_state_dir(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Loads compiled defaults and applies runtime overrides from the environment.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }

    /// Checks that both base URLs are absolute http(s) URLs.
    ///
    /// # Errors
    /// Returns `ClientError::Config` naming the offending value.
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_base_url("API base URL", &self.api_base_url)?;
        validate_base_url("media base URL", &self.media_base_url)?;
        if self.timeout.is_zero() {
            return Err(ClientError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds a URL from the API base URL and the provided path.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

#[derive(Default)]
pub(crate) struct RuntimeConfig {
    pub(crate) api_base_url: Option<String>,
    pub(crate) media_base_url: Option<String>,
    pub(crate) state_dir: Option<String>,
    pub(crate) timeout_seconds: Option<u64>,
}

pub(crate) fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.media_base_url {
        config.media_base_url = value;
    }
    if let Some(value) = runtime.state_dir {
        config.state_dir = PathBuf::from(value);
    }
    if let Some(value) = runtime.timeout_seconds {
        config.timeout = Duration::from_secs(value);
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: read_runtime_value(ENV_API_URL),
        media_base_url: read_runtime_value(ENV_MEDIA_URL),
        state_dir: read_runtime_value(ENV_STATE_DIR),
        timeout_seconds: read_runtime_value(ENV_TIMEOUT).and_then(|v| v.parse().ok()),
    }
}

fn read_runtime_value(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| normalize_runtime_value(&v))
}

pub(crate) fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn default_state_dir() -> PathBuf {
    if let Some(dir) = env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join("catalog-admin");
    }
    if let Some(home) = env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("catalog-admin");
    }
    PathBuf::from(".catalog-admin")
}

fn validate_base_url(label: &str, raw: &str) -> Result<(), ClientError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ClientError::Config(format!("invalid {label} {raw:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(()),
        "http" | "https" => Err(ClientError::Config(format!(
            "invalid {label} {raw:?}: no host specified"
        ))),
        scheme => Err(ClientError::Config(format!(
            "invalid {label} {raw:?}: unsupported scheme {scheme}"
        ))),
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
