//! xpanel - web administration panel
//!
//! Startup: resolve the root folder, open the database, seed the default
//! user, then run the server loop. The loop serves until either a panel
//! restart is signalled (settings are re-read and the server starts again on
//! the possibly new address) or the process is asked to stop.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{info, warn};
use xpanel_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use xpanel_web::scheduler::{Scheduler, TokioScheduler};
use xpanel_web::service::{PanelService, UserService};
use xpanel_web::session::SessionStore;
use xpanel_web::{bind_listener, build_app, AppState};

#[derive(Debug, Parser)]
#[command(name = "xpanel", version, about = "Web administration panel")]
struct Args {
    /// Folder holding xpanel.db (overrides XPANEL_ROOT_FOLDER and config.toml)
    #[arg(long)]
    root_folder: Option<PathBuf>,
}

/// Why the server loop stopped serving
enum Stop {
    Restart,
    Shutdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!("Starting xpanel v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_toml(&toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;
    info!("Root folder: {}", initializer.root_folder().display());

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = xpanel_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    UserService::new(pool.clone())
        .ensure_default_user()
        .await
        .context("Failed to seed default user")?;

    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
    let panel = PanelService::new(scheduler.clone());
    let sessions = SessionStore::new();
    let mut restarts = panel.subscribe();

    #[cfg(unix)]
    spawn_hangup_listener(panel.clone()).context("Failed to install SIGHUP handler")?;

    let mut serving_addr = None;
    loop {
        // Restarts signalled before this point must not stop the new server
        let _ = restarts.borrow_and_update();

        let state = AppState::new(pool.clone(), panel.clone(), scheduler.clone())
            .with_sessions(sessions.clone());
        let setting = state.settings.get_all_setting().await?;
        let addr = state.settings.listen_addr().await?;
        if !setting.web_cert_file.is_empty() {
            warn!("webCertFile is set but TLS is terminated outside xpanel; serving plain HTTP");
        }

        let app = build_app(state, &setting.web_base_path);
        let (listener, addr) = bind_listener(addr, serving_addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        serving_addr = Some(addr);
        info!("xpanel listening on http://{}{}", addr, setting.web_base_path);

        let (stop_tx, stop_rx) = oneshot::channel();
        let stop_signal = restarts.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_tx.send(wait_for_stop(stop_signal).await);
            })
            .await?;

        match stop_rx.await {
            Ok(Stop::Restart) => info!("Restarting panel"),
            Ok(Stop::Shutdown) | Err(_) => break,
        }
    }

    info!("xpanel stopped");
    Ok(())
}

async fn wait_for_stop(mut restarts: watch::Receiver<u64>) -> Stop {
    tokio::select! {
        changed = restarts.changed() => match changed {
            Ok(()) => Stop::Restart,
            Err(_) => Stop::Shutdown,
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            Stop::Shutdown
        }
    }
}

/// SIGHUP restarts the panel immediately
#[cfg(unix)]
fn spawn_hangup_listener(panel: PanelService) -> std::io::Result<()> {
    use std::time::Duration;
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("Received SIGHUP");
            if let Err(e) = panel.restart_panel(Duration::ZERO) {
                warn!("SIGHUP restart failed: {}", e);
            }
        }
    });
    Ok(())
}
