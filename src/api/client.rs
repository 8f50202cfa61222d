//! `ApiClient` bundles the authenticated pipeline with JSON helpers and hands
//! out typed resource clients. Failure statuses become `ClientError`s here;
//! the helpers never store tokens themselves.

use crate::{
    api::{
        pipeline::Authenticated,
        resources::{Categories, ColorTheme, Items, LendingContent, SocialLinks, Styles},
        transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, Transport},
    },
    auth::AuthClient,
    catalog::resolve_image_url,
    config::AppConfig,
    errors::ClientError,
    router::Navigator,
    session::SessionStore,
};
use http::Method;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiClient<T = HttpTransport> {
    pipeline: Authenticated<T>,
    media_base_url: String,
}

impl ApiClient<HttpTransport> {
    /// Builds the default reqwest transport wrapped in the authenticated pipeline.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the configuration is invalid or a client
    /// cannot be constructed.
    pub fn new(
        config: &AppConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        let auth = AuthClient::new(config)?;
        Ok(Self::from_pipeline(
            Authenticated::new(transport, session, auth, navigator),
            &config.media_base_url,
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    #[must_use]
    pub fn from_pipeline(pipeline: Authenticated<T>, media_base_url: &str) -> Self {
        Self {
            pipeline,
            media_base_url: media_base_url.to_string(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.pipeline.session()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        self.pipeline.auth()
    }

    /// Sends a request through the pipeline and rejects failure statuses.
    ///
    /// # Errors
    /// Returns `AuthorizationExpired` for an unrecoverable 401, `Http` for any
    /// other failure status, or a transport error.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.pipeline.send(&request).await?.error_for_status()
    }

    /// # Errors
    /// See [`ApiClient::execute`]; also `Parse` if the body does not match `R`.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    /// # Errors
    /// See [`ApiClient::execute`]; also `Serialization`/`Parse` on encode or decode failure.
    pub async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let request = ApiRequest::new(method, path).with_json(body)?;
        self.execute(request).await?.json()
    }

    /// # Errors
    /// See [`ApiClient::execute`]; also `Parse` if the body does not match `R`.
    pub async fn send_multipart<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<R, ClientError> {
        let request = ApiRequest::new(method, path).with_multipart(parts);
        self.execute(request).await?.json()
    }

    /// # Errors
    /// See [`ApiClient::execute`]; also `Parse` if the body does not match `R`.
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.execute(ApiRequest::delete(path)).await?.json()
    }

    /// Resolves an image reference against the media base URL.
    #[must_use]
    pub fn image_url(&self, url: Option<&str>) -> String {
        resolve_image_url(&self.media_base_url, url)
    }

    #[must_use]
    pub fn categories(&self) -> Categories<'_, T> {
        Categories::new(self)
    }

    #[must_use]
    pub fn items(&self) -> Items<'_, T> {
        Items::new(self)
    }

    #[must_use]
    pub fn styles(&self) -> Styles<'_, T> {
        Styles::new(self)
    }

    #[must_use]
    pub fn lending(&self) -> LendingContent<'_, T> {
        LendingContent::new(self)
    }

    #[must_use]
    pub fn social(&self) -> SocialLinks<'_, T> {
        SocialLinks::new(self)
    }

    #[must_use]
    pub fn color(&self) -> ColorTheme<'_, T> {
        ColorTheme::new(self)
    }
}
