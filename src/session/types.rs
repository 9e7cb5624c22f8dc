use crate::ipc::{IpcError, WindowDescriptor};
use crate::launch::{LaunchSpec, ResolvedLaunch};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One window of a saved session: its descriptor plus how to launch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWindow {
    #[serde(flatten)]
    pub window: WindowDescriptor,
    #[serde(default)]
    pub cmd: String,
    #[serde(rename = "appImage", default, skip_serializing_if = "Option::is_none")]
    pub app_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatpak: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppid: Option<u32>,
}

impl SavedWindow {
    pub fn new(window: WindowDescriptor, launch: ResolvedLaunch) -> Self {
        Self {
            window,
            cmd: launch.cmd,
            app_image: launch.app_image,
            flatpak: launch.flatpak,
            ppid: launch.ppid,
        }
    }

    /// Preferred way of starting this window again
    pub fn launch_spec(&self) -> LaunchSpec {
        if let Some(path) = &self.app_image {
            LaunchSpec::AppImage(path.clone())
        } else if let Some(app_id) = &self.flatpak {
            LaunchSpec::Flatpak(app_id.clone())
        } else if !self.cmd.is_empty() {
            LaunchSpec::Command(self.cmd.clone())
        } else {
            LaunchSpec::Command(self.window.class.clone())
        }
    }
}

/// Ordered snapshot of saved windows
pub type Session = Vec<SavedWindow>;

/// Errors raised while saving or restoring a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Compositor transport failed: {0}")]
    Transport(#[from] IpcError),

    #[error("No saved session at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access session file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed session file: {0}")]
    Format(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_field_names() {
        let saved = SavedWindow::new(
            WindowDescriptor {
                address: "0x1".to_string(),
                class: "obsidian".to_string(),
                initial_class: "obsidian".to_string(),
                initial_title: "Obsidian".to_string(),
                pid: 77,
                ..Default::default()
            },
            ResolvedLaunch {
                cmd: "/tmp/.mount/AppRun".to_string(),
                app_image: Some("/apps/Obsidian.AppImage".to_string()),
                flatpak: None,
                ppid: Some(1),
            },
        );

        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["initialTitle"], "Obsidian");
        assert_eq!(json["initialClass"], "obsidian");
        assert_eq!(json["cmd"], "/tmp/.mount/AppRun");
        assert_eq!(json["appImage"], "/apps/Obsidian.AppImage");
        assert_eq!(json["ppid"], 1);
        assert!(json.get("flatpak").is_none());

        let back: SavedWindow = serde_json::from_value(json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn test_launch_spec_priority() {
        let mut saved = SavedWindow::new(
            WindowDescriptor {
                class: "thing".to_string(),
                ..Default::default()
            },
            ResolvedLaunch {
                cmd: "thing --flag".to_string(),
                app_image: Some("/a.AppImage".to_string()),
                flatpak: Some("org.thing".to_string()),
                ppid: None,
            },
        );
        assert_eq!(saved.launch_spec(), LaunchSpec::AppImage("/a.AppImage".to_string()));

        saved.app_image = None;
        assert_eq!(saved.launch_spec(), LaunchSpec::Flatpak("org.thing".to_string()));

        saved.flatpak = None;
        assert_eq!(saved.launch_spec(), LaunchSpec::Command("thing --flag".to_string()));

        saved.cmd.clear();
        assert_eq!(saved.launch_spec(), LaunchSpec::Command("thing".to_string()));
    }
}
