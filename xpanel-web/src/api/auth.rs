//! Login-required middleware
//!
//! Resolves the session cookie into a [`LoginSession`] and stores it in the
//! request extensions for the handlers. Requests without a live session are
//! rejected with 401 and the usual envelope.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::msg::Msg;
use crate::session::{session_id_from_headers, LoginSession};
use crate::AppState;

pub async fn require_login(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(id) = session_id_from_headers(request.headers()) else {
        return unauthorized();
    };

    let Some(user) = state.sessions.get_login_user(id).await else {
        debug!("Rejected request with unknown session");
        return unauthorized();
    };

    request.extensions_mut().insert(LoginSession { id, user });
    next.run(request).await
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Msg::fail("login", "not logged in")).into_response()
}
