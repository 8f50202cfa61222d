//! Base request function for the catalog API.
//!
//! A `Transport` sends one `ApiRequest` and returns the status and raw body of
//! whatever came back; only transport failures are errors at this level.
//! Decorators such as `Authenticated` wrap a transport and are transports
//! themselves, so the composition is visible where the client is built.

use crate::{
    APP_USER_AGENT,
    config::{AppConfig, CONNECT_TIMEOUT, build_url_with_base},
    errors::ClientError,
};
use bytes::Bytes;
use http::{
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    header::ACCEPT,
};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{future::Future, path::Path, time::Duration};
use tracing::{Instrument, debug, info_span};

/// One file field of a multipart upload.
#[derive(Clone, Debug)]
pub struct FormPart {
    pub name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormPart {
    #[must_use]
    pub fn file(name: &str, file_name: &str, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).map(str::to_string),
            data: data.into(),
        }
    }

    /// Reads a file from disk into a form part.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if the file cannot be read.
    pub async fn from_path(name: &str, path: &Path) -> Result<Self, ClientError> {
        let data = tokio::fs::read(path).await.map_err(|err| {
            ClientError::Serialization(format!("Failed to read {}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        Ok(Self::file(name, file_name, data))
    }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// An outbound call: method, path, body, extra headers and a one-shot flag
/// recording whether it has already been retried after a refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub headers: HeaderMap,
    retried: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if `body` cannot be encoded.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ClientError::Serialization(format!("Failed to encode request: {err}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Adds a per-call header.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if the name or value is not a valid header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| ClientError::Serialization(format!("Invalid header name: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| ClientError::Serialization(format!("Invalid header value: {err}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    #[must_use]
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Marks the request as retried. Returns `false` if it already was.
    pub fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

/// Status and raw body of a response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub body: Bytes,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turns a failure status into the matching `ClientError`.
    ///
    /// # Errors
    /// Returns `AuthorizationExpired` for 401 and `Http` for any other failure status.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status, &self.text()))
        }
    }

    /// Decodes the body as JSON. An empty body decodes as `null`.
    ///
    /// # Errors
    /// Returns `ClientError::Parse` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body)
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
    }
}

pub trait Transport: Send + Sync {
    /// Sends the request and returns whatever status the server answered with.
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}

/// reqwest-backed transport bound to the API base URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.api_base_url, config.timeout)
    }

    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint_url(&request.path);
        debug!("api request: {} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(ACCEPT, "application/json")
            .headers(request.headers.clone());

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let span = info_span!(
            "api.request",
            http.method = %request.method,
            url = %url
        );
        let response = builder.send().instrument(span).await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("api response: {} {}", status, url);

        Ok(ApiResponse { url, status, body })
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        let mut field = Part::bytes(part.data.to_vec()).file_name(part.file_name.clone());
        if let Some(content_type) = &part.content_type {
            field = field.mime_str(content_type).map_err(|err| {
                ClientError::Serialization(format!("Invalid content type {content_type}: {err}"))
            })?;
        }
        form = form.part(part.name.clone(), field);
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{ApiRequest, ApiResponse, FormPart, content_type_for};
    use crate::errors::ClientError;
    use bytes::Bytes;
    use http::StatusCode;
    use serde_json::Value;

    #[test]
    fn mark_retried_is_one_shot() {
        let mut request = ApiRequest::get("/item");
        assert!(!request.is_retried());
        assert!(request.mark_retried());
        assert!(request.is_retried());
        assert!(!request.mark_retried());
    }

    #[test]
    fn retry_flag_is_per_instance() {
        let mut first = ApiRequest::get("/item");
        let second = ApiRequest::get("/item");
        first.mark_retried();
        assert!(!second.is_retried());
    }

    #[test]
    fn with_header_rejects_invalid_values() {
        assert!(ApiRequest::get("/").with_header("X-Trace", "ok").is_ok());
        assert!(ApiRequest::get("/").with_header("bad header", "x").is_err());
        assert!(ApiRequest::get("/").with_header("X-Trace", "line\nbreak").is_err());
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let response = ApiResponse {
            url: "http://api.test/item/1".to_string(),
            status: StatusCode::OK,
            body: Bytes::new(),
        };
        let value: Value = response.json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn error_for_status_maps_statuses() {
        let response = ApiResponse {
            url: "http://api.test/item".to_string(),
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(b"missing"),
        };
        assert_eq!(
            response.error_for_status().unwrap_err(),
            ClientError::Http {
                status: 404,
                message: "missing".to_string()
            }
        );
    }

    #[test]
    fn form_part_guesses_image_types() {
        assert_eq!(content_type_for("photo.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for("logo.png"), Some("image/png"));
        assert_eq!(content_type_for("notes"), None);

        let part = FormPart::file("image", "cover.webp", vec![1, 2, 3]);
        assert_eq!(part.content_type.as_deref(), Some("image/webp"));
        assert_eq!(part.data.len(), 3);
    }
}
