//! Uniform JSON response envelope
//!
//! `{"success": bool, "msg": action, "data"?: payload, "error"?: text}`,
//! always with HTTP 200 unless a middleware rejects the request first.

use crate::error::PanelResult;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, Serialize)]
pub struct Msg {
    pub success: bool,
    /// Action key, translated by the frontend
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Msg {
    pub fn ok(action: &str) -> Self {
        Self {
            success: true,
            msg: action.to_string(),
            data: None,
            error: None,
        }
    }

    pub fn obj<T: Serialize>(action: &str, obj: &T) -> Self {
        match serde_json::to_value(obj) {
            Ok(data) => Self {
                data: Some(data),
                ..Self::ok(action)
            },
            Err(e) => Self::fail(action, e),
        }
    }

    pub fn fail(action: &str, err: impl Display) -> Self {
        Self {
            success: false,
            msg: action.to_string(),
            data: None,
            error: Some(err.to_string()),
        }
    }
}

impl IntoResponse for Msg {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Envelope for an operation without payload
pub fn json_msg(action: &str, result: PanelResult<()>) -> Msg {
    match result {
        Ok(()) => Msg::ok(action),
        Err(e) => Msg::fail(action, e),
    }
}

/// Envelope for an operation returning `T`
pub fn json_obj<T: Serialize>(action: &str, result: PanelResult<T>) -> Msg {
    match result {
        Ok(obj) => Msg::obj(action, &obj),
        Err(e) => Msg::fail(action, e),
    }
}
