use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash (default: `http://localhost:8000`).
    pub api_url: String,
    /// Directory generated config files are saved into (default: `.`).
    pub download_dir: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_dir: PathBuf::from("."),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load `.env` (if present) and then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_env()
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `SCENEGEN_API_URL`              | `http://localhost:8000` |
    /// | `SCENEGEN_DOWNLOAD_DIR`         | `.`                     |
    /// | `SCENEGEN_REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = get("SCENEGEN_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let download_dir = get("SCENEGEN_DOWNLOAD_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        let request_timeout_secs = match get("SCENEGEN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SCENEGEN_REQUEST_TIMEOUT_SECS",
                expected: "u64",
                value: raw.clone(),
            })?,
            None => defaults.request_timeout_secs,
        };

        Ok(Self {
            api_url,
            download_dir,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_vars(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_vars(lookup(&[
            ("SCENEGEN_API_URL", "http://backend:9000/"),
            ("SCENEGEN_DOWNLOAD_DIR", "/tmp/configs"),
            ("SCENEGEN_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/configs"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ClientConfig::from_vars(lookup(&[
            ("SCENEGEN_API_URL", "  "),
            ("SCENEGEN_DOWNLOAD_DIR", ""),
        ]))
        .unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.download_dir, PathBuf::from("."));
    }

    #[test]
    fn invalid_timeout_is_an_error() {
        let result =
            ClientConfig::from_vars(lookup(&[("SCENEGEN_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "SCENEGEN_REQUEST_TIMEOUT_SECS", .. })
        );
    }
}
