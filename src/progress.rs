//! Human-readable progress lines for interactive runs.
//!
//! These go to stdout independently of `tracing` output; `--silent`
//! suppresses them without changing anything else.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    silent: bool,
}

impl Progress {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn silent() -> Self {
        Self::new(true)
    }

    pub fn report(&self, message: impl Display) {
        if !self.silent {
            println!("{}", message);
        }
    }
}
