//! # Hyprland Session Daemon
//!
//! Saves the open windows of a Hyprland session and brings them back after a
//! restart: windows that are still running are put back in place, missing
//! ones are relaunched with their placement attached as window rules.
//!
//! ## Architecture Overview
//!
//! - **[`ipc`]**: control socket client and the typed dispatch vocabulary
//! - **[`window`]**: saved-to-live window matching and group reconstruction
//! - **[`launch`]**: launch command resolution from `/proc`
//! - **[`session`]**: snapshot, persistence, the restore pass and the daemon loop
//! - **[`cli`]**: argument parsing and configuration discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hypr_session::{HyprlandClient, ProcResolver, SessionStore, store_session};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HyprlandClient::from_env(Duration::from_secs(1))?;
//!     let store = SessionStore::new("/tmp/session.json");
//!
//!     let result = store_session(&client, &ProcResolver::new(), &store).await?;
//!     println!("Saved {} windows", result.windows);
//!     Ok(())
//! }
//! ```

/// Compositor control channel.
///
/// Window listing and typed dispatch commands over the Hyprland
/// request/reply socket, behind the [`ipc::Compositor`] trait.
pub mod ipc;

/// Window matching and group tracking used during a restore pass.
pub mod window;

/// Launch command resolution.
pub mod launch;

/// Session capture, persistence and restoration.
///
/// Contains the reconciler that drives a restore pass and the manager that
/// serializes passes and runs the auto-save timer.
pub mod session;

/// Environment constants and path utilities.
///
/// Centralizes socket locations, XDG directories and file names used
/// throughout the application.
pub mod env;

/// User-facing progress lines.
pub mod progress;

// CLI module for command-line interface
pub mod cli;

pub use ipc::{Compositor, Dispatch, HyprlandClient, IpcError, WindowDescriptor};
pub use launch::{AppResolver, LaunchSpec, ProcResolver, ResolvedLaunch};
pub use progress::Progress;
pub use session::{
    Reconciler, RestoreOutcome, SavedWindow, Session, SessionError, SessionManager,
    SessionManagerConfig, SessionStore, capture_session, store_session,
};
pub use window::{GroupTracker, MatchRule};
