//! Restore pass: pairs every saved window with a live one, or launches it,
//! and brings its placement back in line with the snapshot.

use crate::ipc::{Compositor, Dispatch, GroupRule, IpcError, WindowDescriptor, WindowRule};
use crate::progress::Progress;
use crate::session::types::{SavedWindow, Session, SessionError};
use crate::window::{GroupMember, GroupTracker, MatchRule, matcher};
use std::cmp::Reverse;
use tracing::{debug, error, info};

/// How a saved window was brought back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    /// Paired with a live window, which received `commands` property commands
    Found { rule: MatchRule, commands: usize },
    /// Launched with its placement attached as window rules
    Launched,
}

/// Totals of one restore pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub matched: usize,
    pub launched: usize,
    pub commands: usize,
}

/// Order in which a session is restored: largest groups first, keeping the
/// saved order among windows of equal group size.
pub fn restore_order(mut session: Session) -> Session {
    session.sort_by_key(|saved| Reverse(saved.window.group_size()));
    session
}

/// One restore pass over a session.
///
/// The group tracker lives exactly as long as the pass; `restore` consumes
/// the reconciler so it cannot be reused.
pub struct Reconciler<'a> {
    compositor: &'a dyn Compositor,
    progress: Progress,
    groups: GroupTracker,
}

impl<'a> Reconciler<'a> {
    pub fn new(compositor: &'a dyn Compositor, progress: Progress) -> Self {
        Self {
            compositor,
            progress,
            groups: GroupTracker::new(),
        }
    }

    /// Restore every window of `session`. The first failure aborts the
    /// remaining pass.
    pub async fn restore(mut self, session: Session) -> Result<RestoreSummary, SessionError> {
        let ordered = restore_order(session);
        let mut summary = RestoreSummary::default();

        info!("Restoring {} windows", ordered.len());
        self.progress.report(format!("🔄 Restoring {} windows", ordered.len()));

        for saved in &ordered {
            match self.restore_window(saved).await {
                Ok(WindowOutcome::Found { rule, commands }) => {
                    summary.matched += 1;
                    summary.commands += commands;
                    self.progress.report(format!(
                        "  ✓ {} (matched by {})",
                        display_name(&saved.window),
                        rule
                    ));
                }
                Ok(WindowOutcome::Launched) => {
                    summary.launched += 1;
                    summary.commands += 1;
                    self.progress.report(format!("  🚀 {} launched", display_name(&saved.window)));
                }
                Err(e) => {
                    error!(
                        "Restore aborted at '{}': {}",
                        display_name(&saved.window),
                        e
                    );
                    self.progress.report(format!("❌ Restore aborted: {}", e));
                    return Err(e);
                }
            }
        }

        info!(
            "Restore finished: {} matched, {} launched, {} commands",
            summary.matched, summary.launched, summary.commands
        );
        Ok(summary)
    }

    /// Locate or launch a single saved window
    pub async fn restore_window(
        &mut self,
        saved: &SavedWindow,
    ) -> Result<WindowOutcome, SessionError> {
        let live = self.compositor.list_windows().await?;

        match matcher::find(&saved.window, &live) {
            Some((found, rule)) => {
                debug!(
                    "'{}' matched live window {} by {}",
                    display_name(&saved.window),
                    found.address,
                    rule
                );
                let commands = self.set_window_properties(&saved.window, found).await?;
                Ok(WindowOutcome::Found { rule, commands })
            }
            None => {
                let dispatch = self.launch_dispatch(saved);
                debug!(
                    "No live match for '{}', launching {}",
                    display_name(&saved.window),
                    saved.launch_spec()
                );
                self.send(&dispatch).await?;
                Ok(WindowOutcome::Launched)
            }
        }
    }

    /// Bring a live window in line with its saved state. Returns the number
    /// of commands issued; a window already in place gets none.
    pub async fn set_window_properties(
        &mut self,
        saved: &WindowDescriptor,
        live: &WindowDescriptor,
    ) -> Result<usize, SessionError> {
        let address = live.address.clone();
        let mut commands = Vec::new();

        if saved.floating && !live.floating {
            commands.push(Dispatch::SetFloating {
                address: address.clone(),
            });
        } else if !saved.floating && live.floating {
            commands.push(Dispatch::SetTiled {
                address: address.clone(),
            });
        }

        if saved.floating && saved.has_size() && saved.size != live.size {
            commands.push(Dispatch::Resize {
                address: address.clone(),
                width: saved.size[0],
                height: saved.size[1],
            });
        }

        if saved.floating && saved.at != live.at {
            commands.push(Dispatch::Move {
                address: address.clone(),
                x: saved.at[0],
                y: saved.at[1],
            });
        }

        // Takes the bare workspace name: `web` stays `web`, `special:scratch`
        // becomes `scratch`. Exec rules use `rule_selector()` instead.
        if saved.workspace.name != live.workspace.name {
            commands.push(Dispatch::MoveToWorkspace {
                address: address.clone(),
                workspace: saved.workspace.bare_name().to_string(),
            });
        }

        if let Some(key) = saved.group_key() {
            if live.grouped.is_empty() {
                let joined = self
                    .groups
                    .observe(&key, GroupMember::live(address.clone(), live.at[0]));

                commands.push(Dispatch::FocusWindow {
                    address: address.clone(),
                });
                match self.groups.side_of(&key, live.at[0]) {
                    Some(side) if joined => commands.push(Dispatch::MoveIntoGroup(side)),
                    _ => commands.push(Dispatch::ToggleGroup),
                }
            }

            let complete = self.groups.member_count(&key) == saved.group_size();
            if complete {
                debug!(
                    "Group {} rebuilt with live members {:?}",
                    key,
                    self.groups.live_key(&key).unwrap_or_default()
                );
            }
            if complete && saved.workspace.is_special() {
                commands.push(Dispatch::ToggleSpecialWorkspace {
                    name: saved.workspace.bare_name().to_string(),
                });
            }
        }

        for dispatch in &commands {
            self.send(dispatch).await?;
        }
        Ok(commands.len())
    }

    /// Build the `exec` dispatch that starts a saved window with its
    /// placement applied as window rules.
    pub fn launch_dispatch(&mut self, saved: &SavedWindow) -> Dispatch {
        let window = &saved.window;
        let mut rules = Vec::new();

        if window.floating {
            rules.push(WindowRule::Float);
            if window.has_size() {
                rules.push(WindowRule::Size {
                    width: window.size[0],
                    height: window.size[1],
                });
            }
            rules.push(WindowRule::Move {
                x: window.at[0],
                y: window.at[1],
            });
        } else {
            rules.push(WindowRule::Tile);
        }

        if window.fullscreen > 0 {
            rules.push(WindowRule::Fullscreen);
        }

        if let Some(key) = window.group_key() {
            let joined = self
                .groups
                .observe(&key, GroupMember::launched(window.at[0]));
            rules.push(WindowRule::Group(if joined {
                GroupRule::Invade
            } else {
                GroupRule::Set
            }));
        }

        if !window.workspace.name.is_empty() {
            rules.push(WindowRule::Workspace {
                selector: window.workspace.rule_selector(),
                silent: true,
            });
        }

        Dispatch::Exec {
            rules,
            command: saved.launch_spec().command_line(),
        }
    }

    // An empty reply means the request timed out.
    async fn send(&self, dispatch: &Dispatch) -> Result<(), SessionError> {
        let request = dispatch.to_request();
        debug!("Dispatching: {}", request);

        let reply = self.compositor.dispatch(dispatch).await?;
        if reply.trim().is_empty() {
            return Err(IpcError::EmptyReply(request).into());
        }
        Ok(())
    }

    pub fn groups(&self) -> &GroupTracker {
        &self.groups
    }
}

fn display_name(window: &WindowDescriptor) -> &str {
    if !window.initial_title.is_empty() {
        &window.initial_title
    } else if !window.class.is_empty() {
        &window.class
    } else {
        &window.address
    }
}
