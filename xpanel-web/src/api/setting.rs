//! Settings controller
//!
//! All routes are POST under `/setting` and require a login session:
//! - `/all`: read the settings bundle
//! - `/update`: persist a new bundle, restarting the panel when the language changes
//! - `/updateUser`: change the logged-in user's credentials
//! - `/restartPanel`: restart the panel after a grace period

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::msg::{json_msg, json_obj, Msg};
use crate::entity::{AllSetting, User};
use crate::error::{PanelError, PanelResult};
use crate::service::RESTART_GRACE;
use crate::session::LoginSession;
use crate::AppState;

/// Delay before a language change restarts the panel
pub const LANGUAGE_RESTART_DELAY: Duration = Duration::from_secs(1);

const GET_SETTINGS: &str = "get_settings";
const GET_OLD_SETTINGS: &str = "get_old_settings";
const UPDATE_SETTINGS: &str = "update_settings";
const UPDATE_USER: &str = "update_user";
const RESTART_PANEL: &str = "restart_panel";

/// Request body of `/setting/updateUser`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserForm {
    pub old_username: String,
    pub old_password: String,
    pub new_username: String,
    pub new_password: String,
}

pub fn setting_routes() -> Router<AppState> {
    Router::new()
        .route("/all", post(get_all_setting))
        .route("/update", post(update_setting))
        .route("/updateUser", post(update_user))
        .route("/restartPanel", post(restart_panel))
}

/// POST /setting/all
pub async fn get_all_setting(State(state): State<AppState>) -> Msg {
    let result = state.settings.get_all_setting().await.map_err(PanelError::from);
    if let Err(e) = &result {
        error!("Failed to read settings: {}", e);
    }
    json_obj(GET_SETTINGS, result)
}

/// POST /setting/update
///
/// The response reflects the persist step only. A language change schedules
/// a restart that runs detached from this request; its outcome is logged.
pub async fn update_setting(
    State(state): State<AppState>,
    payload: Result<Json<AllSetting>, JsonRejection>,
) -> Msg {
    let all_setting = match payload {
        Ok(Json(all_setting)) => all_setting,
        Err(rejection) => return Msg::fail(UPDATE_SETTINGS, rejection.body_text()),
    };

    let old_setting = match state.settings.get_all_setting().await {
        Ok(old_setting) => old_setting,
        Err(e) => {
            error!("Failed to read current settings: {}", e);
            return Msg::fail(GET_OLD_SETTINGS, e);
        }
    };

    if let Err(e) = state.settings.update_all_setting(&all_setting).await {
        warn!("Settings update rejected: {}", e);
        return Msg::fail(UPDATE_SETTINGS, e);
    }

    if old_setting.language != all_setting.language {
        info!(
            "Language changed from {} to {}, restarting panel",
            old_setting.language, all_setting.language
        );
        let panel = state.panel.clone();
        state.scheduler.schedule(
            LANGUAGE_RESTART_DELAY,
            Box::pin(async move {
                if let Err(e) = panel.restart_panel(RESTART_GRACE) {
                    warn!("Panel restart after language change failed: {}", e);
                }
            }),
        );
    }

    Msg::ok(UPDATE_SETTINGS)
}

/// POST /setting/updateUser
pub async fn update_user(
    State(state): State<AppState>,
    Extension(login): Extension<LoginSession>,
    form: Result<Json<UpdateUserForm>, JsonRejection>,
) -> Msg {
    let form = match form {
        Ok(Json(form)) => form,
        Err(rejection) => return Msg::fail(UPDATE_USER, rejection.body_text()),
    };
    json_msg(UPDATE_USER, change_credentials(&state, login, form).await)
}

async fn change_credentials(
    state: &AppState,
    login: LoginSession,
    form: UpdateUserForm,
) -> PanelResult<()> {
    let user = login.user;
    if user.username != form.old_username || user.password != form.old_password {
        warn!(user_id = user.id, "Credential change with wrong old credentials");
        return Err(PanelError::IncorrectOldCredentials);
    }
    if form.new_username.is_empty() || form.new_password.is_empty() {
        return Err(PanelError::EmptyNewCredentials);
    }

    state
        .users
        .update_user(user.id, &form.new_username, &form.new_password)
        .await?;

    let renamed = User {
        username: form.new_username,
        password: form.new_password,
        ..user
    };
    if !state.sessions.set_login_user(login.id, renamed).await {
        warn!(
            user_id = user.id,
            "Credentials changed but the session ended before it could be updated"
        );
    }
    Ok(())
}

/// POST /setting/restartPanel
pub async fn restart_panel(State(state): State<AppState>) -> Msg {
    json_msg(RESTART_PANEL, state.panel.restart_panel(RESTART_GRACE))
}
