//! Login sessions
//!
//! Sessions live in memory and are addressed by a random id carried in the
//! `xpanel_session` cookie. The store survives panel restarts because the
//! server loop hands the same store to every router it builds.

use crate::entity::User;
use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "xpanel_session";

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Session resolved by the login middleware for the current request
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub id: SessionId,
    pub user: User,
}

/// In-memory session store
///
/// The inner lock serializes identity updates; callers never lock
/// around a get/set pair themselves.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, User>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user`
    pub async fn create(&self, user: User) -> SessionId {
        let id = SessionId::new_random();
        self.sessions.write().await.insert(id, user);
        id
    }

    pub async fn get_login_user(&self, id: SessionId) -> Option<User> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Replace the identity of an existing session
    ///
    /// Returns false when the session is gone (logged out meanwhile).
    pub async fn set_login_user(&self, id: SessionId, user: User) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(current) => {
                *current = user;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: SessionId) -> Option<User> {
        self.sessions.write().await.remove(&id)
    }
}

/// Extract the session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

/// `Set-Cookie` value starting a session
///
/// `max_age_minutes` of 0 leaves the cookie a browser-session cookie. Huge
/// values saturate at `i64::MAX` seconds.
pub fn session_cookie(id: SessionId, max_age_minutes: i64) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    if max_age_minutes > 0 {
        let seconds = max_age_minutes.saturating_mul(60);
        cookie.push_str(&format!("; Max-Age={}", seconds));
    }
    cookie
}

/// `Set-Cookie` value clearing the session cookie
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
