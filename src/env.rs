//! Environment constants and path utilities for hypr-session.
//!
//! This module centralizes the hardcoded paths, file names and environment
//! variable names used throughout the application.

use std::path::{Path, PathBuf};

/// Application directory name under the XDG config and data homes
pub const APP_DIR_NAME: &str = "hypr-session";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "hypr-session.toml";

/// Session file name inside the data directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// Compositor IPC environment
pub mod ipc {
    /// Identifies the running compositor instance
    pub const INSTANCE_SIGNATURE_VAR: &str = "HYPRLAND_INSTANCE_SIGNATURE";

    pub const RUNTIME_DIR_VAR: &str = "XDG_RUNTIME_DIR";

    /// Directory holding per-instance sockets, relative to the runtime dir
    pub const SOCKET_DIR_NAME: &str = "hypr";

    /// Request/reply control socket name
    pub const CONTROL_SOCKET_NAME: &str = ".socket.sock";

    /// Used when `XDG_RUNTIME_DIR` is unset
    pub const LEGACY_SOCKET_ROOT: &str = "/tmp";
}

/// Process inspection
pub mod proc {
    pub const PROC_ROOT: &str = "/proc";

    /// Set by AppImage runtimes to the image path
    pub const APPIMAGE_VAR: &str = "APPIMAGE";

    /// Metadata file present in the root of every flatpak sandbox
    pub const FLATPAK_INFO_FILE: &str = ".flatpak-info";

    pub const FLATPAK_BINARY: &str = "flatpak";
}

/// Build the control socket path for a compositor instance
pub fn control_socket_path(runtime_dir: Option<&Path>, signature: &str) -> PathBuf {
    runtime_dir
        .unwrap_or_else(|| Path::new(ipc::LEGACY_SOCKET_ROOT))
        .join(ipc::SOCKET_DIR_NAME)
        .join(signature)
        .join(ipc::CONTROL_SOCKET_NAME)
}

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`
pub fn config_home() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_DATA_HOME`, falling back to `~/.local/share`
pub fn data_home() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative)))
}

/// Build the user config file path from a config home
pub fn user_config_file_path(config_home: &Path) -> PathBuf {
    config_home.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build the local config file path in a directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}

/// Build the session file path from a data home
pub fn session_file_path(data_home: &Path) -> PathBuf {
    data_home.join(APP_DIR_NAME).join(SESSION_FILE_NAME)
}

/// Session file used when neither the CLI nor the config names one
pub fn default_session_file() -> PathBuf {
    data_home()
        .map(|dir| session_file_path(&dir))
        .unwrap_or_else(|| PathBuf::from(SESSION_FILE_NAME))
}
