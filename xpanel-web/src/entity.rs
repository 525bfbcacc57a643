//! Panel entities: the settings bundle and the login user

use crate::error::{PanelError, PanelResult};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Full settings bundle
///
/// Serialized camelCase; each field is stored as one row of the `settings`
/// table keyed by its serialized name. Fields missing from a request body
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllSetting {
    /// Listen IP, empty for all interfaces
    pub web_listen: String,
    pub web_port: u16,
    pub web_cert_file: String,
    pub web_key_file: String,
    /// URL prefix the panel is served under, always `/.../`
    pub web_base_path: String,
    /// Login cookie lifetime in minutes, 0 for a browser session
    pub session_max_age: i64,
    /// Days before expiry at which clients are flagged
    pub expire_diff: i64,
    /// Remaining traffic (GB) at which clients are flagged
    pub traffic_diff: i64,
    pub time_location: String,
    /// Display language; changing it restarts the panel
    pub language: String,
}

impl Default for AllSetting {
    fn default() -> Self {
        Self {
            web_listen: String::new(),
            web_port: 54321,
            web_cert_file: String::new(),
            web_key_file: String::new(),
            web_base_path: "/".to_string(),
            session_max_age: 0,
            expire_diff: 0,
            traffic_diff: 0,
            time_location: "Asia/Tehran".to_string(),
            language: "en-US".to_string(),
        }
    }
}

impl AllSetting {
    /// Validate the bundle and normalize `web_base_path` in place
    pub fn check_valid(&mut self) -> PanelResult<()> {
        if !self.web_listen.is_empty() && self.web_listen.parse::<IpAddr>().is_err() {
            return Err(PanelError::InvalidSetting(format!(
                "web listen is not a valid IP: {}",
                self.web_listen
            )));
        }

        if self.web_port == 0 {
            return Err(PanelError::InvalidSetting(
                "web port must be between 1 and 65535".to_string(),
            ));
        }

        if self.web_cert_file.is_empty() != self.web_key_file.is_empty() {
            return Err(PanelError::InvalidSetting(
                "web cert file and key file must be set together".to_string(),
            ));
        }

        if self.time_location.trim().is_empty() {
            return Err(PanelError::InvalidSetting(
                "time location cannot be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("session max age", self.session_max_age),
            ("expire diff", self.expire_diff),
            ("traffic diff", self.traffic_diff),
        ] {
            if value < 0 {
                return Err(PanelError::InvalidSetting(format!(
                    "{} cannot be negative: {}",
                    name, value
                )));
            }
        }

        if !self.web_base_path.starts_with('/') {
            self.web_base_path.insert(0, '/');
        }
        if !self.web_base_path.ends_with('/') {
            self.web_base_path.push('/');
        }

        Ok(())
    }
}

/// Panel account, also the identity held by a login session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}
