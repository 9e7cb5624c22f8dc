use crate::ipc::Compositor;
use crate::launch::AppResolver;
use crate::session::persistence::{PersistenceResult, SessionStore};
use crate::session::types::{SavedWindow, Session, SessionError};
use futures::future::join_all;
use tracing::debug;

/// Capture the live window set together with each window's launch fields.
///
/// Launch resolution runs concurrently across windows; the result keeps the
/// compositor's window order.
pub async fn capture_session(
    compositor: &dyn Compositor,
    resolver: &dyn AppResolver,
) -> Result<Session, SessionError> {
    let windows = compositor.list_windows().await?;
    debug!("Resolving launch commands for {} windows", windows.len());

    let launches = join_all(windows.iter().map(|window| resolver.resolve(window))).await;

    Ok(windows
        .into_iter()
        .zip(launches)
        .map(|(window, launch)| SavedWindow::new(window, launch))
        .collect())
}

/// Capture the live session and write it to `store`
pub async fn store_session(
    compositor: &dyn Compositor,
    resolver: &dyn AppResolver,
    store: &SessionStore,
) -> Result<PersistenceResult, SessionError> {
    let session = capture_session(compositor, resolver).await?;
    store.save(&session).await
}
