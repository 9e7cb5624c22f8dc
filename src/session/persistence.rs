use crate::session::types::{SavedWindow, Session, SessionError};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Whole-file JSON store for the saved session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

/// Result of a save operation
#[derive(Debug)]
pub struct PersistenceResult {
    pub windows: usize,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the saved session. A missing file is `SessionError::NotFound`.
    pub async fn load(&self) -> Result<Session, SessionError> {
        if !self.exists() {
            return Err(SessionError::NotFound(self.path.clone()));
        }

        let start_time = std::time::Instant::now();
        let content = async_fs::read(&self.path)
            .await
            .map_err(|source| self.persistence_error(source))?;

        let session: Session = serde_json::from_slice(&content)?;

        debug!(
            "Session loaded: {} windows in {}ms",
            session.len(),
            start_time.elapsed().as_millis()
        );
        Ok(session)
    }

    /// Replace the saved session atomically: write a sibling temp file, then
    /// rename it over the old one.
    pub async fn save(&self, session: &[SavedWindow]) -> Result<PersistenceResult, SessionError> {
        let start_time = std::time::Instant::now();

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|source| self.persistence_error(source))?;
        }

        let content = serde_json::to_vec_pretty(session)?;
        let temp_file = self.temp_path();

        let write_result = async {
            let mut file = async_fs::File::create(&temp_file).await?;
            file.write_all(&content).await?;
            file.sync_all().await?;
            async_fs::rename(&temp_file, &self.path).await
        }
        .await;

        if let Err(source) = write_result {
            let _ = async_fs::remove_file(&temp_file).await;
            return Err(self.persistence_error(source));
        }

        let result = PersistenceResult {
            windows: session.len(),
            bytes_written: content.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Session saved: {} windows, {} bytes in {}ms",
            result.windows, result.bytes_written, result.duration_ms
        );
        Ok(result)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persistence_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}
