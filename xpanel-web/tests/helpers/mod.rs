//! Shared helpers for xpanel-web integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tower::util::ServiceExt; // for `oneshot`
use xpanel_common::sys::Protocol;
use xpanel_web::entity::User;
use xpanel_web::scheduler::{Scheduler, Task};
use xpanel_web::service::{ConnectionCounter, PanelService};
use xpanel_web::session::SESSION_COOKIE;
use xpanel_web::{build_router, AppState};

/// Scheduler that records every request and runs tasks only on demand
#[derive(Default)]
pub struct RecordingScheduler {
    pending: Mutex<Vec<Task>>,
    delays: Mutex<Vec<Duration>>,
}

impl RecordingScheduler {
    /// Delays of every task scheduled so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Run the tasks pending right now (tasks they schedule stay pending)
    pub async fn run_pending(&self) {
        let tasks: Vec<Task> = self.pending.lock().unwrap().drain(..).collect();
        for task in tasks {
            task.await;
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.delays.lock().unwrap().push(delay);
        self.pending.lock().unwrap().push(task);
    }
}

/// Connection counter returning canned results
pub struct FakeCounter {
    pub tcp: Result<usize, (io::ErrorKind, &'static str)>,
    pub udp: Result<usize, (io::ErrorKind, &'static str)>,
}

impl ConnectionCounter for FakeCounter {
    fn count(&self, protocol: Protocol) -> io::Result<usize> {
        let result = match protocol {
            Protocol::Tcp => self.tcp,
            Protocol::Udp => self.udp,
        };
        result.map_err(|(kind, message)| io::Error::new(kind, message))
    }
}

/// Router plus the handles tests inspect
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub db: SqlitePool,
    pub scheduler: Arc<RecordingScheduler>,
    /// Stands in for the server loop; dropping it makes restarts unavailable
    pub restarts: watch::Receiver<u64>,
}

/// In-memory database with schema and the default admin user
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    xpanel_common::db::create_schema(&pool)
        .await
        .expect("Should create schema");
    xpanel_web::service::UserService::new(pool.clone())
        .ensure_default_user()
        .await
        .expect("Should seed default user");
    pool
}

pub async fn setup_app() -> TestApp {
    setup_app_with_counter(Arc::new(FakeCounter {
        tcp: Ok(0),
        udp: Ok(0),
    }))
    .await
}

pub async fn setup_app_with_counter(counter: Arc<dyn ConnectionCounter>) -> TestApp {
    let db = setup_test_db().await;
    let scheduler = Arc::new(RecordingScheduler::default());
    let panel = PanelService::new(scheduler.clone());
    let restarts = panel.subscribe();
    let state =
        AppState::new(db.clone(), panel, scheduler.clone()).with_connection_counter(counter);

    TestApp {
        app: build_router(state.clone()),
        state,
        db,
        scheduler,
        restarts,
    }
}

/// Start a session for `user` directly in the store and return its cookie
pub async fn login_as(state: &AppState, user: User) -> String {
    let id = state.sessions.create(user).await;
    format!("{}={}", SESSION_COOKIE, id)
}

/// Change the seeded admin's password to `secret` and log in as admin/secret
pub async fn login_admin_secret(state: &AppState) -> (String, User) {
    state
        .users
        .update_user(1, "admin", "secret")
        .await
        .expect("Should set admin password");
    let user = User {
        id: 1,
        username: "admin".to_string(),
        password: "secret".to_string(),
    };
    (login_as(state, user.clone()).await, user)
}

pub fn post_json(uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

/// Send a request and return status plus parsed JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}
