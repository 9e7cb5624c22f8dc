use anyhow::{Context, Result};
use hypr_session::cli::{Args, ConfigDiscovery, ExecutionMode};
use hypr_session::{
    HyprlandClient, ProcResolver, Progress, RestoreOutcome, SessionManager, SessionStore,
};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let manager = match args.mode() {
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            return Ok(());
        }
        _ => build_manager(&args)?,
    };

    match args.mode() {
        ExecutionMode::SaveOnly => {
            manager
                .store_session()
                .await
                .context("Failed to save session")?;
        }
        ExecutionMode::RestoreOnly => {
            let outcome = manager
                .restore_session()
                .await
                .context("Failed to restore session")?;
            if let RestoreOutcome::Aborted(e) = outcome {
                warn!("Restore stopped early: {}", e);
            }
        }
        ExecutionMode::Daemon | ExecutionMode::ShowConfig => {
            info!("Starting session daemon");
            manager
                .run(shutdown_signal())
                .await
                .context("Session daemon stopped")?;
        }
    }

    Ok(())
}

fn build_manager(args: &Args) -> Result<Arc<SessionManager>> {
    let mut config = ConfigDiscovery::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    let client = HyprlandClient::from_env(config.ipc_timeout())
        .context("Cannot locate the Hyprland control socket")?;
    info!("Using control socket {}", client.socket_path().display());

    let store = SessionStore::new(config.session_file());
    info!("Using session file {}", store.path().display());

    Ok(Arc::new(SessionManager::new(
        Arc::new(client),
        Arc::new(ProcResolver::for_root(&config.proc_root)),
        store,
        config.session.clone(),
        Progress::new(config.silent),
    )))
}

/// Resolves on the first SIGINT or SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
