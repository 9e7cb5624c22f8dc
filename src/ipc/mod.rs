//! # Compositor IPC
//!
//! The compositor is the single source of truth for which windows are open.
//! This module exposes it through the [`Compositor`] trait:
//!
//! - **Window Set Accessor**: [`Compositor::list_windows`] fetches the live
//!   window set. Nothing is cached; every call is a fresh round trip.
//! - **Dispatch**: [`Compositor::dispatch`] sends one typed [`Dispatch`]
//!   command and returns the compositor's textual reply unparsed.
//!
//! [`HyprlandClient`] implements the trait over the Hyprland control socket,
//! bounding every round trip with a timeout.
//!
//! ```rust,no_run
//! use hypr_session::ipc::{Compositor, HyprlandClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HyprlandClient::from_env(Duration::from_millis(1000))?;
//!     for window in client.list_windows().await? {
//!         println!("{} on {}", window.class, window.workspace.name);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

pub mod client;
pub mod types;

pub use client::HyprlandClient;
pub use types::*;

/// Control channel of the running compositor
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Fetch the current window set
    async fn list_windows(&self) -> Result<Vec<WindowDescriptor>, IpcError>;

    /// Issue one dispatcher command and return the raw reply
    async fn dispatch(&self, dispatch: &Dispatch) -> Result<String, IpcError>;
}
