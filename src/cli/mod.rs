//! CLI-specific functionality for the session daemon
//!
//! This module contains argument parsing and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, ExecutionMode};
pub use config::{ConfigDiscovery, SessionConfig};
