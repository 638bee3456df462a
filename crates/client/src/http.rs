//! REST client for the scenegen backend.
//!
//! Wraps the library endpoints (`/api/scenes`, `/api/environments`,
//! `/api/settings/defaults`) and config generation (`/api/generate`) using
//! [`reqwest`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use scenegen_core::catalog::CatalogData;
use scenegen_core::request::GenerateRequest;
use scenegen_core::scene::{Environment, SceneTemplate};
use scenegen_core::settings::TechDefaults;

use crate::config::ClientConfig;
use crate::transport::{Transport, TransportError};

/// HTTP client for a single backend instance.
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
}

impl HttpTransport {
    /// Create a client from configuration, applying the request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8000`.
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// `GET /api/scenes`.
    pub async fn fetch_scenes(&self) -> Result<Vec<SceneTemplate>, TransportError> {
        let response = self.client.get(self.url("/api/scenes")).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /api/environments`.
    pub async fn fetch_environments(&self) -> Result<Vec<Environment>, TransportError> {
        let response = self
            .client
            .get(self.url("/api/environments"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `GET /api/settings/defaults`. A `404` means the library has no
    /// defaults configured and yields `Ok(None)`.
    pub async fn fetch_tech_defaults(&self) -> Result<Option<TechDefaults>, TransportError> {
        let response = self
            .client
            .get(self.url("/api/settings/defaults"))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!("Backend has no default technical settings");
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Ensure the response has a success status code. On failure, the body
    /// is read and parsed as JSON (if possible) into the error's `detail`.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_catalog(&self) -> Result<CatalogData, TransportError> {
        let (scenes, environments, tech_defaults) = tokio::try_join!(
            self.fetch_scenes(),
            self.fetch_environments(),
            self.fetch_tech_defaults(),
        )?;

        let catalog = CatalogData {
            scenes,
            environments,
            tech_defaults,
        };
        catalog.validate()?;

        tracing::info!(
            scenes = catalog.scenes.len(),
            environments = catalog.environments.len(),
            has_defaults = catalog.tech_defaults.is_some(),
            "Library catalog fetched",
        );
        Ok(catalog)
    }

    /// `POST /api/generate`; the response body is the config file.
    async fn generate_config(&self, request: &GenerateRequest) -> Result<Vec<u8>, TransportError> {
        tracing::info!(scenes = request.scenes.len(), "Submitting generate request");

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;

        tracing::debug!(bytes = bytes.len(), "Generated config received");
        Ok(bytes.to_vec())
    }
}

/// Build a [`TransportError::Status`] from a failed response. Bodies that
/// are not JSON leave `detail` empty.
fn status_error(status: StatusCode, body: &str) -> TransportError {
    let detail = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());

    tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
    TransportError::Status {
        status: status.as_u16(),
        message,
        detail,
    }
}
