//! The transport seam between a session and the backend.
//!
//! [`Transport`] is what the [`Session`](crate::session::Session) talks to;
//! [`HttpTransport`](crate::http::HttpTransport) is the production
//! implementation and tests substitute their own.

use async_trait::async_trait;

use scenegen_core::catalog::CatalogData;
use scenegen_core::error::CoreError;
use scenegen_core::request::GenerateRequest;

/// Errors from the backend transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Status text, e.g. `Unprocessable Entity`.
        message: String,
        /// Parsed JSON error body, when the backend sent one.
        detail: Option<serde_json::Value>,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog decoded but failed domain checks.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CoreError),
}

impl TransportError {
    /// The most specific human-readable description of a status failure:
    /// the backend's `detail` payload when present, otherwise the status
    /// text. `None` for failures that never reached a status code.
    pub fn status_detail(&self) -> Option<String> {
        match self {
            TransportError::Status {
                message, detail, ..
            } => Some(match detail {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => message.clone(),
            }),
            _ => None,
        }
    }
}

/// Backend operations a session depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch scenes, environments and technical defaults. Missing defaults
    /// are reported as `tech_defaults: None`, not as an error.
    async fn fetch_catalog(&self) -> Result<CatalogData, TransportError>;

    /// Submit a request and return the generated config file contents.
    async fn generate_config(&self, request: &GenerateRequest) -> Result<Vec<u8>, TransportError>;
}
