//! Window identity across compositor restarts.
//!
//! Saved windows are paired with live ones by semantic heuristics
//! ([`matcher`]); live addresses are only used inside a single restore pass
//! to track group membership ([`group`]).

pub mod group;
pub mod matcher;

pub use group::{GroupMember, GroupTracker};
pub use matcher::{MatchRule, find};
