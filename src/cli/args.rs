//! Command line argument parsing
//!
//! Without a mode flag the daemon restores the saved session, then keeps
//! snapshotting until it receives SIGINT or SIGTERM:
//! - `--restore-only`: restore once and exit
//! - `--save-only`: snapshot once and exit
//! - `--show-config`: show configuration discovery information

use super::config::SessionConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Daemon,      // Restore, then auto-save until shutdown
    RestoreOnly, // Restore and exit
    SaveOnly,    // Snapshot and exit
    ShowConfig,  // Show configuration discovery info
}

#[derive(Debug, Default, Parser)]
#[command(name = "hypr-session")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Save and restore Hyprland window sessions")]
#[command(long_about = None)]
pub struct Args {
    /// Restore the saved session and exit
    #[arg(long = "restore-only", conflicts_with_all = ["save_only", "show_config"])]
    pub restore_only: bool,
    /// Snapshot the current session and exit
    #[arg(long = "save-only", conflicts_with = "show_config")]
    pub save_only: bool,
    /// Disable periodic snapshots while running
    #[arg(long = "no-auto-save")]
    pub no_auto_save: bool,
    /// Seconds between periodic snapshots
    #[arg(
        long = "save-interval",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub save_interval: Option<u64>,
    /// Suppress progress output
    #[arg(short = 's', long = "silent")]
    pub silent: bool,
    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Session file path
    #[arg(long = "session-file", value_name = "FILE")]
    pub session_file: Option<PathBuf>,
    /// Show configuration discovery information
    #[arg(long = "show-config")]
    pub show_config: bool,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.show_config {
            ExecutionMode::ShowConfig
        } else if self.restore_only {
            ExecutionMode::RestoreOnly
        } else if self.save_only {
            ExecutionMode::SaveOnly
        } else {
            ExecutionMode::Daemon
        }
    }

    /// Default log filter; `RUST_LOG` takes precedence when set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "hypr_session=debug"
        } else {
            "hypr_session=warn"
        }
    }

    /// Apply command line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut SessionConfig) {
        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }
        if let Some(secs) = self.save_interval {
            config.session.save_interval_secs = secs;
        }
        if self.no_auto_save {
            config.session.auto_save = false;
        }
        if self.silent {
            config.silent = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_daemon() {
        let args = Args::try_parse_from(["hypr-session"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::Daemon);
        assert_eq!(args.log_filter(), "hypr_session=warn");
    }

    #[test]
    fn test_mode_flags() {
        let args = Args::try_parse_from(["hypr-session", "--restore-only"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::RestoreOnly);

        let args = Args::try_parse_from(["hypr-session", "--save-only"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::SaveOnly);

        let args = Args::try_parse_from(["hypr-session", "--show-config"]).unwrap();
        assert_eq!(args.mode(), ExecutionMode::ShowConfig);
    }

    #[test]
    fn test_conflicting_modes_rejected() {
        assert!(Args::try_parse_from(["hypr-session", "--restore-only", "--save-only"]).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Args::try_parse_from(["hypr-session", "--save-interval", "0"]).is_err());
        assert!(Args::try_parse_from(["hypr-session", "--save-interval", "soon"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let args = Args::try_parse_from([
            "hypr-session",
            "--no-auto-save",
            "--save-interval",
            "15",
            "--session-file",
            "/tmp/custom.json",
            "-s",
            "-d",
        ])
        .unwrap();

        let mut config = SessionConfig::default();
        args.apply_overrides(&mut config);

        assert!(!config.session.auto_save);
        assert_eq!(config.session.save_interval_secs, 15);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/custom.json")));
        assert!(config.silent);
        assert_eq!(args.log_filter(), "hypr_session=debug");
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let args = Args::default();
        let mut config = SessionConfig::default();
        config.session.save_interval_secs = 300;
        config.session_file = Some(PathBuf::from("/srv/session.json"));

        args.apply_overrides(&mut config);

        assert!(config.session.auto_save);
        assert_eq!(config.session.save_interval_secs, 300);
        assert_eq!(config.session_file, Some(PathBuf::from("/srv/session.json")));
    }
}
