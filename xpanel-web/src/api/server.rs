//! Server status controller

use axum::{extract::State, routing::post, Router};
use serde::Serialize;
use xpanel_common::sys::Protocol;

use crate::api::msg::{json_obj, Msg};
use crate::error::PanelResult;
use crate::AppState;

/// Connection counts of the host
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub tcp_count: usize,
    pub udp_count: usize,
}

pub fn server_routes() -> Router<AppState> {
    Router::new().route("/status", post(status))
}

/// POST /server/status
pub async fn status(State(state): State<AppState>) -> Msg {
    json_obj("server_status", server_status(&state))
}

fn server_status(state: &AppState) -> PanelResult<ServerStatus> {
    Ok(ServerStatus {
        tcp_count: state.connections.count(Protocol::Tcp)?,
        udp_count: state.connections.count(Protocol::Udp)?,
    })
}
