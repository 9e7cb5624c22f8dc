use crate::ipc::Compositor;
use crate::launch::AppResolver;
use crate::progress::Progress;
use crate::session::persistence::{PersistenceResult, SessionStore};
use crate::session::reconciler::{Reconciler, RestoreSummary};
use crate::session::snapshot;
use crate::session::types::SessionError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, interval_at, timeout};
use tracing::{debug, error, info, warn};

/// Configuration for the session manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionManagerConfig {
    /// Take periodic snapshots while running
    pub auto_save: bool,
    pub save_interval_secs: u64,
    /// Upper bound for the snapshot taken on shutdown
    pub shutdown_snapshot_timeout_ms: u64,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            save_interval_secs: 60,
            shutdown_snapshot_timeout_ms: 3000,
        }
    }
}

/// Result of the startup restore
#[derive(Debug)]
pub enum RestoreOutcome {
    Restored(RestoreSummary),
    /// The pass stopped at its first failure
    Aborted(SessionError),
    /// No session was saved yet, so the live session was captured instead
    FreshSnapshot(PersistenceResult),
}

/// Owns the collaborators and serializes restore and snapshot passes.
///
/// Only one pass runs at a time: a periodic snapshot never overlaps an
/// in-progress restore.
pub struct SessionManager {
    compositor: Arc<dyn Compositor>,
    resolver: Arc<dyn AppResolver>,
    store: SessionStore,
    config: SessionManagerConfig,
    progress: Progress,
    pass_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(
        compositor: Arc<dyn Compositor>,
        resolver: Arc<dyn AppResolver>,
        store: SessionStore,
        config: SessionManagerConfig,
        progress: Progress,
    ) -> Self {
        Self {
            compositor,
            resolver,
            store,
            config,
            progress,
            pass_lock: Mutex::new(()),
        }
    }

    /// Snapshot the live session, waiting for any pass in progress
    pub async fn store_session(&self) -> Result<PersistenceResult, SessionError> {
        let _pass = self.pass_lock.lock().await;
        self.store_session_locked().await
    }

    async fn store_session_locked(&self) -> Result<PersistenceResult, SessionError> {
        debug!("Saving session to {}", self.store.path().display());

        let result = snapshot::store_session(
            self.compositor.as_ref(),
            self.resolver.as_ref(),
            &self.store,
        )
        .await?;

        self.progress
            .report(format!("💾 Saved {} windows", result.windows));
        Ok(result)
    }

    /// Restore the saved session, or capture a fresh one when none exists.
    ///
    /// Failures inside the restore pass are reported as
    /// [`RestoreOutcome::Aborted`]; only persistence failures are errors.
    pub async fn restore_session(&self) -> Result<RestoreOutcome, SessionError> {
        let _pass = self.pass_lock.lock().await;

        let session = match self.store.load().await {
            Ok(session) => session,
            Err(SessionError::NotFound(path)) => {
                info!(
                    "No saved session at {}, capturing the current one",
                    path.display()
                );
                self.progress
                    .report("📭 No saved session found, saving the current one");
                return Ok(RestoreOutcome::FreshSnapshot(
                    self.store_session_locked().await?,
                ));
            }
            Err(e) => return Err(e),
        };

        let reconciler = Reconciler::new(self.compositor.as_ref(), self.progress);
        match reconciler.restore(session).await {
            Ok(summary) => {
                self.progress.report(format!(
                    "✅ Restored session: {} matched, {} launched",
                    summary.matched, summary.launched
                ));
                Ok(RestoreOutcome::Restored(summary))
            }
            Err(e) => Ok(RestoreOutcome::Aborted(e)),
        }
    }

    /// Restore, then snapshot on every interval tick until `shutdown`
    /// resolves. A failed snapshot stops the loop with an error.
    pub async fn run<F>(self: Arc<Self>, shutdown: F) -> Result<(), SessionError>
    where
        F: Future<Output = ()>,
    {
        let mut restore = tokio::spawn({
            let manager = self.clone();
            async move { manager.restore_session().await }
        });
        let mut restoring = true;

        let period = Duration::from_secs(self.config.save_interval_secs.max(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        tokio::pin!(shutdown);

        if self.config.auto_save {
            info!("Auto-save enabled every {}s", period.as_secs());
        }

        loop {
            tokio::select! {
                joined = &mut restore, if restoring => {
                    restoring = false;
                    match joined {
                        Ok(Ok(RestoreOutcome::Aborted(e))) => {
                            warn!("Restore pass aborted: {}", e);
                        }
                        Ok(Ok(outcome)) => debug!("Restore finished: {:?}", outcome),
                        Ok(Err(e)) => {
                            error!("Restore failed: {}", e);
                            return Err(e);
                        }
                        Err(join_error) => error!("Restore task failed: {}", join_error),
                    }
                }
                _ = ticker.tick(), if self.config.auto_save => {
                    // A pass still holding the lock means a restore is running
                    let Ok(_pass) = self.pass_lock.try_lock() else {
                        debug!("Pass in progress, skipping this auto-save");
                        continue;
                    };
                    if let Err(e) = self.store_session_locked().await {
                        error!("Auto-save failed: {}", e);
                        return Err(e);
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    if restoring {
                        restore.abort();
                    }
                    self.final_snapshot().await;
                    return Ok(());
                }
            }
        }
    }

    /// Best-effort snapshot before exit, bounded by the configured timeout
    pub async fn final_snapshot(&self) {
        let limit = Duration::from_millis(self.config.shutdown_snapshot_timeout_ms);

        match timeout(limit, self.store_session()).await {
            Ok(Ok(result)) => info!("Final snapshot saved {} windows", result.windows),
            Ok(Err(e)) => warn!("Final snapshot failed: {}", e),
            Err(_) => warn!("Final snapshot timed out after {:?}", limit),
        }
    }
}
