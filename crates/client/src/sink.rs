//! Where generated config files end up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to save {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),
}

/// Receives a generated artifact under a suggested file name.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<(), SinkError>;
}

/// Saves artifacts as files inside one directory, replacing any existing
/// file of the same name.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve `file_name` inside the sink directory. Names containing path
    /// separators or parent references are rejected.
    fn target(&self, file_name: &str) -> Result<PathBuf, SinkError> {
        let candidate = Path::new(file_name);
        let is_plain = candidate.file_name().is_some_and(|n| n == candidate.as_os_str());
        if file_name.is_empty() || !is_plain {
            return Err(SinkError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<(), SinkError> {
        let path = self.target(file_name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::Io {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved generated config");
        Ok(())
    }
}
