//! Launch resolution.
//!
//! When a session is saved, every window is annotated with the means of
//! starting it again: an AppImage path, a flatpak application id, or the
//! raw command line of its process. The raw command line is always present
//! as a fallback.

use crate::ipc::WindowDescriptor;
use async_trait::async_trait;
use std::fmt;

pub mod resolver;

pub use resolver::ProcResolver;

/// Launch fields recorded next to a saved window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLaunch {
    pub cmd: String,
    pub app_image: Option<String>,
    pub flatpak: Option<String>,
    pub ppid: Option<u32>,
}

/// How a window gets started again, in order of preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSpec {
    AppImage(String),
    Flatpak(String),
    Command(String),
}

impl LaunchSpec {
    /// Command line handed to the compositor's `exec`
    pub fn command_line(&self) -> String {
        match self {
            LaunchSpec::AppImage(path) => shell_escape::escape(path.as_str().into()).into_owned(),
            LaunchSpec::Flatpak(app_id) => format!("flatpak run {}", app_id),
            LaunchSpec::Command(cmd) => cmd.clone(),
        }
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchSpec::AppImage(path) => write!(f, "AppImage {}", path),
            LaunchSpec::Flatpak(app_id) => write!(f, "flatpak {}", app_id),
            LaunchSpec::Command(cmd) => write!(f, "command '{}'", cmd),
        }
    }
}

/// Determines how to relaunch the application behind a window.
///
/// Resolution never fails: implementations fall back to a raw command.
#[async_trait]
pub trait AppResolver: Send + Sync {
    async fn resolve(&self, window: &WindowDescriptor) -> ResolvedLaunch;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        assert_eq!(
            LaunchSpec::AppImage("/opt/apps/My App.AppImage".to_string()).command_line(),
            "'/opt/apps/My App.AppImage'"
        );
        assert_eq!(
            LaunchSpec::Flatpak("org.mozilla.firefox".to_string()).command_line(),
            "flatpak run org.mozilla.firefox"
        );
        assert_eq!(
            LaunchSpec::Command("foo --bar".to_string()).command_line(),
            "foo --bar"
        );
    }
}
