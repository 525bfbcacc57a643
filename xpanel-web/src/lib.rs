//! xpanel-web library - administration panel HTTP service
//!
//! Exposes the router and its state so `main` and the integration tests
//! build the same application.

use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod entity;
pub mod error;
pub mod scheduler;
pub mod service;
pub mod session;

pub use crate::error::{PanelError, PanelResult};

use crate::scheduler::Scheduler;
use crate::service::{
    ConnectionCounter, PanelService, SettingService, SystemConnectionCounter, UserService,
};
use crate::session::SessionStore;

/// Application state shared across HTTP handlers
///
/// Every process-wide collaborator is injected here; handlers reach nothing
/// through globals.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingService,
    pub users: UserService,
    pub panel: PanelService,
    pub sessions: SessionStore,
    /// Runs deferred work such as the language-change restart
    pub scheduler: Arc<dyn Scheduler>,
    pub connections: Arc<dyn ConnectionCounter>,
    /// Startup time of this server instance, reset by each restart
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State with a fresh session store and the host connection counter
    pub fn new(db: SqlitePool, panel: PanelService, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            settings: SettingService::new(db.clone()),
            users: UserService::new(db),
            panel,
            sessions: SessionStore::new(),
            scheduler,
            connections: Arc::new(SystemConnectionCounter),
            startup_time: Utc::now(),
        }
    }

    /// Reuse an existing session store (kept across panel restarts)
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_connection_counter(mut self, connections: Arc<dyn ConnectionCounter>) -> Self {
        self.connections = connections;
        self
    }
}

/// Build application router
///
/// `/setting/*` and `/server/*` require a login session; `/login`,
/// `/logout` and `/health` do not.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/setting", api::setting_routes())
        .nest("/server", api::server_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_login,
        ));

    let public = Router::new()
        .merge(api::index_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the router served under `base_path` (e.g. `/panel/`)
pub fn build_app(state: AppState, base_path: &str) -> Router {
    let router = build_router(state);
    let prefix = base_path.trim_matches('/');
    if prefix.is_empty() {
        router
    } else {
        Router::new().nest(&format!("/{}", prefix), router)
    }
}

/// Bind the panel listener
///
/// When `addr` cannot be bound and the panel was serving on `previous`
/// before a restart, the panel stays on `previous`. Returns the listener
/// and the address it was bound with.
pub async fn bind_listener(
    addr: SocketAddr,
    previous: Option<SocketAddr>,
) -> io::Result<(TcpListener, SocketAddr)> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, addr)),
        Err(e) => match previous {
            Some(previous) if previous != addr => {
                warn!("Cannot bind {}: {}; keeping {}", addr, e, previous);
                let listener = TcpListener::bind(previous).await?;
                Ok((listener, previous))
            }
            _ => Err(e),
        },
    }
}
