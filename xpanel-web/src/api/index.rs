//! Login and logout

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::msg::Msg;
use crate::error::PanelError;
use crate::session::{expired_session_cookie, session_cookie, session_id_from_headers};
use crate::AppState;

const LOGIN: &str = "login";
const LOGOUT: &str = "logout";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub fn index_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// POST /login
///
/// Starts a session and sets the session cookie. The cookie lifetime comes
/// from `sessionMaxAge`; if settings cannot be read the cookie is a browser
/// session cookie.
pub async fn login(
    State(state): State<AppState>,
    form: Result<Json<LoginForm>, JsonRejection>,
) -> Response {
    let form = match form {
        Ok(Json(form)) => form,
        Err(rejection) => return Msg::fail(LOGIN, rejection.body_text()).into_response(),
    };

    let user = match state.users.check_user(&form.username, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(username = %form.username, "Login failed");
            return Msg::fail(LOGIN, PanelError::WrongCredentials).into_response();
        }
        Err(e) => return Msg::fail(LOGIN, e).into_response(),
    };

    let max_age = state
        .settings
        .get_all_setting()
        .await
        .map(|setting| setting.session_max_age)
        .unwrap_or(0);

    info!(username = %user.username, "User logged in");
    let id = state.sessions.create(user).await;
    (
        [(header::SET_COOKIE, session_cookie(id, max_age))],
        Msg::ok(LOGIN),
    )
        .into_response()
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        if let Some(user) = state.sessions.remove(id).await {
            info!(username = %user.username, "User logged out");
        }
    }
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Msg::ok(LOGOUT),
    )
        .into_response()
}
