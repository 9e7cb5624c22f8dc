//! `/proc` based launch resolution.

use super::{AppResolver, ResolvedLaunch};
use crate::env;
use crate::ipc::WindowDescriptor;
use async_trait::async_trait;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::debug;

static FLATPAK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^name\s*=\s*(\S+)\s*$").expect("flatpak name pattern is valid")
});

/// Resolves launch commands by inspecting the window's process
#[derive(Debug, Clone)]
pub struct ProcResolver {
    proc_root: PathBuf,
    flatpak_available: bool,
}

impl ProcResolver {
    /// Resolver over the host `/proc`
    pub fn new() -> Self {
        Self::for_root(env::proc::PROC_ROOT)
    }

    /// Resolver over `proc_root`, keeping flatpak ids only when the
    /// `flatpak` binary is on `PATH`
    pub fn for_root(proc_root: impl Into<PathBuf>) -> Self {
        let flatpak_available = which::which(env::proc::FLATPAK_BINARY).is_ok();
        Self::with_root(proc_root, flatpak_available)
    }

    pub fn with_root(proc_root: impl Into<PathBuf>, flatpak_available: bool) -> Self {
        Self {
            proc_root: proc_root.into(),
            flatpak_available,
        }
    }

    fn process_dir(&self, pid: i32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    async fn command_line(&self, dir: &Path) -> Option<String> {
        let raw = fs::read(dir.join("cmdline")).await.ok()?;
        let args: Vec<String> = split_nul(&raw)
            .map(|arg| shell_escape::escape(Cow::Borrowed(arg)).into_owned())
            .collect();

        if args.is_empty() {
            None
        } else {
            Some(args.join(" "))
        }
    }

    async fn app_image(&self, dir: &Path) -> Option<String> {
        let raw = fs::read(dir.join("environ")).await.ok()?;
        let prefix = format!("{}=", env::proc::APPIMAGE_VAR);

        split_nul(&raw)
            .find_map(|entry| entry.strip_prefix(prefix.as_str()))
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }

    async fn flatpak_id(&self, dir: &Path) -> Option<String> {
        if !self.flatpak_available {
            return None;
        }

        let info = fs::read_to_string(dir.join("root").join(env::proc::FLATPAK_INFO_FILE))
            .await
            .ok()?;
        parse_flatpak_info(&info)
    }

    async fn parent_pid(&self, dir: &Path) -> Option<u32> {
        let stat = fs::read_to_string(dir.join("stat")).await.ok()?;
        parse_ppid(&stat)
    }
}

impl Default for ProcResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppResolver for ProcResolver {
    async fn resolve(&self, window: &WindowDescriptor) -> ResolvedLaunch {
        if window.pid <= 0 {
            debug!("Window {} has no pid, using its class", window.address);
            return ResolvedLaunch {
                cmd: window.class.clone(),
                ..Default::default()
            };
        }

        let dir = self.process_dir(window.pid);
        let cmd = match self.command_line(&dir).await {
            Some(cmd) => cmd,
            None => {
                debug!(
                    "No command line for pid {}, falling back to class '{}'",
                    window.pid, window.class
                );
                window.class.clone()
            }
        };

        ResolvedLaunch {
            cmd,
            app_image: self.app_image(&dir).await,
            flatpak: self.flatpak_id(&dir).await,
            ppid: self.parent_pid(&dir).await,
        }
    }
}

fn split_nul(raw: &[u8]) -> impl Iterator<Item = &str> {
    raw.split(|byte| *byte == 0)
        .filter(|part| !part.is_empty())
        .filter_map(|part| std::str::from_utf8(part).ok())
}

/// Application id from the `[Application]` section of `.flatpak-info`
fn parse_flatpak_info(info: &str) -> Option<String> {
    let (_, rest) = info.split_once("[Application]")?;
    let section = rest.split("\n[").next().unwrap_or(rest);
    FLATPAK_NAME
        .captures(section)
        .map(|captures| captures[1].to_string())
}

// The command name in /proc/<pid>/stat may contain spaces and parentheses,
// so fields are counted from the last ')'.
fn parse_ppid(stat: &str) -> Option<u32> {
    let (_, fields) = stat.rsplit_once(')')?;
    fields.split_whitespace().nth(1)?.parse().ok()
}
