//! # REST API Client
//!
//! `reqwest` implementation of [`Backend`] for the ShopDesk REST API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list/get/create/update/delete                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  headers: Content-Type, Authorization: Bearer <token>, X-Request-Id    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send ──► timeout? ──► ClientError::Timeout                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status 2xx ──► JSON body ──► T                                        │
//! │  status 401/403 ──► Unauthorized(message)                              │
//! │  status 404 ──► NotFound { resource, id }                              │
//! │  other ──► Http { status, message }                                    │
//! │            message = body.message, else body.error, else body[..200]   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::resource::Resource;

/// Correlation header sent with every request.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest slice of a non-JSON error body kept in the message.
const ERROR_BODY_PREVIEW: usize = 200;

/// Error body shape used by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the ShopDesk REST API.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::load(None)?;
/// let client = ApiClient::new(&config)?;
/// let products: Vec<Product> = client.list(config.token()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// Creates a client for the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| {
                ClientError::InvalidConfig(format!("Failed to initialize HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            timeout_secs: config.api.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{path}` or `{base}/{path}/{id}`.
    fn url(&self, path: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, path, id),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    fn headers(&self, token: Option<&str>, request_id: &str) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Unauthorized(format!("Invalid token format: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        Ok(headers)
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
    ) -> ClientResult<(RequestBuilder, String)> {
        let request_id = Uuid::new_v4().to_string();
        let builder = self
            .client
            .request(method, url)
            .headers(self.headers(token, &request_id)?);
        Ok((builder, request_id))
    }

    /// Sends a request and returns the raw status and body.
    async fn send(&self, builder: RequestBuilder) -> ClientResult<(StatusCode, String)> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok((status, body))
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::from(err)
        }
    }

    /// Sends a request for resource `T` and decodes a successful body.
    async fn exchange<T, R>(
        &self,
        method: Method,
        id: Option<&str>,
        body: Option<&T>,
        token: Option<&str>,
    ) -> ClientResult<R>
    where
        T: Resource,
        R: DeserializeOwned,
    {
        let url = self.url(T::PATH, id);
        let (mut builder, request_id) = self.request(method.clone(), &url, token)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, %url, %request_id, resource = T::NAME, "API request");
        let (status, text) = self.send(builder).await?;
        debug!(%method, %url, %request_id, status = status.as_u16(), "API response");

        if !status.is_success() {
            let err = error_for_status(status, &text, T::NAME, id);
            warn!(%method, %url, %request_id, error = %err, "API request failed");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::Decode(format!(
                "{} - {}",
                e,
                text.chars().take(ERROR_BODY_PREVIEW).collect::<String>()
            ))
        })
    }
}

/// Maps a non-success response to an error carrying the backend's message.
fn error_for_status(
    status: StatusCode,
    body: &str,
    resource: &str,
    id: Option<&str>,
) -> ClientError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|err| err.message.or(err.error))
        .unwrap_or_else(|| {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            if preview.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                preview
            }
        });

    match (status, id) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            ClientError::Unauthorized(message)
        }
        (StatusCode::NOT_FOUND, Some(id)) => ClientError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        },
        _ => ClientError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn list<T: Resource>(&self, token: Option<&str>) -> ClientResult<Vec<T>> {
        self.exchange::<T, Vec<T>>(Method::GET, None, None, token).await
    }

    async fn get<T: Resource>(&self, id: &str, token: Option<&str>) -> ClientResult<T> {
        self.exchange::<T, T>(Method::GET, Some(id), None, token)
            .await
    }

    async fn create<T: Resource>(&self, item: &T, token: Option<&str>) -> ClientResult<T> {
        self.exchange::<T, T>(Method::POST, None, Some(item), token)
            .await
    }

    async fn update<T: Resource>(
        &self,
        id: &str,
        item: &T,
        token: Option<&str>,
    ) -> ClientResult<T> {
        self.exchange::<T, T>(Method::PUT, Some(id), Some(item), token)
            .await
    }

    async fn delete<T: Resource>(&self, id: &str, token: Option<&str>) -> ClientResult<()> {
        let url = self.url(T::PATH, Some(id));
        let (builder, request_id) = self.request(Method::DELETE, &url, token)?;

        debug!(%url, %request_id, resource = T::NAME, "API delete");
        let (status, text) = self.send(builder).await?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, T::NAME, Some(id)));
        }
        Ok(())
    }
}
