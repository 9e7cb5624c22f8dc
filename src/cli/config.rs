//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./hypr-session.toml
//! 2. User config: $XDG_CONFIG_HOME/hypr-session/config.toml
//!    (or ~/.config/hypr-session/config.toml)
//! 3. Built-in defaults

use crate::{env, session::SessionManagerConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the session is saved; defaults to the XDG data directory
    pub session_file: Option<PathBuf>,
    /// Bound on every compositor round trip
    pub ipc_timeout_ms: u64,
    /// Root of the process filesystem used for launch resolution
    pub proc_root: PathBuf,
    pub silent: bool,
    pub session: SessionManagerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_file: None,
            ipc_timeout_ms: 1000,
            proc_root: PathBuf::from(env::proc::PROC_ROOT),
            silent: false,
            session: SessionManagerConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(env::default_session_file)
    }

    pub fn ipc_timeout(&self) -> Duration {
        Duration::from_millis(self.ipc_timeout_ms)
    }

    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load `explicit` when given, otherwise walk the discovery hierarchy
    pub fn load(explicit: Option<&Path>) -> Result<SessionConfig> {
        match explicit {
            Some(path) => {
                info!("Loading configuration override from: {:?}", path);
                SessionConfig::from_toml_file(path)
            }
            None => Self::discover_config(),
        }
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<SessionConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return SessionConfig::from_toml_file(config_path);
        }

        debug!("No configuration file found, using defaults");
        Ok(SessionConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        Self::get_config_candidates().into_iter().find(|candidate| {
            debug!("Checking for config file: {:?}", candidate);
            candidate.is_file()
        })
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(config_home) = env::config_home() {
            candidates.push(env::user_config_file_path(&config_home));
        }

        candidates
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::find_config_file() {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();

        assert_eq!(config.ipc_timeout(), Duration::from_secs(1));
        assert!(config.session.auto_save);
        assert_eq!(config.session.save_interval_secs, 60);
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut original_config = SessionConfig::default();
        original_config.session_file = Some(temp_dir.path().join("session.json"));
        original_config.session.save_interval_secs = 120;

        original_config.to_toml_file(&config_path).unwrap();
        let loaded_config = SessionConfig::from_toml_file(&config_path).unwrap();

        assert_eq!(original_config, loaded_config);
        assert_eq!(loaded_config.session_file(), temp_dir.path().join("session.json"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            ipc_timeout_ms = 250

            [session]
            auto_save = false
            "#,
        )
        .unwrap();

        assert_eq!(config.ipc_timeout_ms, 250);
        assert!(!config.session.auto_save);
        assert_eq!(config.session.save_interval_secs, 60);
        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "ipc_timeout_ms = \"fast\"").unwrap();

        let error = SessionConfig::from_toml_file(&config_path).unwrap_err();
        assert!(error.to_string().contains("broken.toml"));
    }

    #[test]
    #[serial]
    fn test_config_candidates() {
        let candidates = ConfigDiscovery::get_config_candidates();

        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].file_name().unwrap(), "hypr-session.toml");
    }
}
