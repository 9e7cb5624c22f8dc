//! Hyprland control socket client.
//!
//! Every request opens a fresh connection, writes the payload, and reads the
//! reply until the compositor closes the stream.

use super::{Compositor, Dispatch, IpcError, WindowDescriptor};
use crate::env;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, warn};

/// Request returning every mapped client as JSON
const CLIENTS_REQUEST: &str = "j/clients";

/// Request/reply client for the compositor control socket
#[derive(Debug, Clone)]
pub struct HyprlandClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl HyprlandClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    /// Locate the socket of the running instance from the environment
    pub fn from_env(timeout: Duration) -> Result<Self, IpcError> {
        let signature = std::env::var(env::ipc::INSTANCE_SIGNATURE_VAR)
            .map_err(|_| IpcError::MissingInstance)?;
        let runtime_dir = std::env::var_os(env::ipc::RUNTIME_DIR_VAR).map(PathBuf::from);

        Ok(Self::new(
            env::control_socket_path(runtime_dir.as_deref(), &signature),
            timeout,
        ))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one request. A request that outlives the timeout yields an
    /// empty reply instead of an error.
    pub async fn request(&self, payload: &str) -> Result<String, IpcError> {
        debug!("IPC request: {}", payload);

        match tokio::time::timeout(self.timeout, self.round_trip(payload)).await {
            Ok(reply) => reply,
            Err(_) => {
                warn!(
                    "IPC request '{}' timed out after {:?}",
                    payload, self.timeout
                );
                Ok(String::new())
            }
        }
    }

    async fn round_trip(&self, payload: &str) -> Result<String, IpcError> {
        let mut stream =
            UnixStream::connect(&self.socket_path)
                .await
                .map_err(|source| IpcError::Connect {
                    path: self.socket_path.display().to_string(),
                    source,
                })?;

        stream.write_all(payload.as_bytes()).await?;
        stream.flush().await?;

        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await?;

        Ok(String::from_utf8_lossy(&reply).into_owned())
    }
}

#[async_trait]
impl Compositor for HyprlandClient {
    async fn list_windows(&self) -> Result<Vec<WindowDescriptor>, IpcError> {
        let reply = self.request(CLIENTS_REQUEST).await?;
        if reply.trim().is_empty() {
            return Err(IpcError::EmptyReply(CLIENTS_REQUEST.to_string()));
        }

        let windows: Vec<WindowDescriptor> = serde_json::from_str(&reply)?;
        debug!("Compositor reported {} windows", windows.len());
        Ok(windows)
    }

    async fn dispatch(&self, dispatch: &Dispatch) -> Result<String, IpcError> {
        self.request(&dispatch.to_request()).await
    }
}
