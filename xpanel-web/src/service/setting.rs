//! Settings service
//!
//! Stores [`AllSetting`] in the `settings` table, one row per field keyed by
//! the field's serialized name. Rows that are missing read as the field
//! default; rows for unknown keys are ignored.

use crate::entity::AllSetting;
use crate::error::PanelResult;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;
use xpanel_common::{Error, Result};

#[derive(Clone)]
pub struct SettingService {
    db: SqlitePool,
}

impl SettingService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Read the full settings bundle
    pub async fn get_all_setting(&self) -> Result<AllSetting> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.db)
            .await?;
        let stored: HashMap<String, String> = rows.into_iter().collect();

        let mut fields = to_field_map(&AllSetting::default())?;
        for (key, default) in fields.iter_mut() {
            if let Some(text) = stored.get(key) {
                *default = parse_field(key, text, default)?;
            }
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| Error::Config(format!("Invalid stored settings: {}", e)))
    }

    /// Validate and persist the full settings bundle in one transaction
    pub async fn update_all_setting(&self, setting: &AllSetting) -> PanelResult<()> {
        let mut setting = setting.clone();
        setting.check_valid()?;

        let fields = to_field_map(&setting)?;
        let mut tx = self.db.begin().await.map_err(Error::Database)?;
        for (key, value) in &fields {
            sqlx::query(
                "INSERT INTO settings (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(field_text(value))
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }
        tx.commit().await.map_err(Error::Database)?;

        info!("Settings updated ({} fields)", fields.len());
        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub async fn listen_addr(&self) -> Result<SocketAddr> {
        let setting = self.get_all_setting().await?;
        let ip = if setting.web_listen.is_empty() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            setting.web_listen.parse().map_err(|_| {
                Error::Config(format!("Invalid webListen: {}", setting.web_listen))
            })?
        };
        Ok(SocketAddr::new(ip, setting.web_port))
    }

    /// URL prefix the panel is served under
    pub async fn base_path(&self) -> Result<String> {
        Ok(self.get_all_setting().await?.web_base_path)
    }
}

fn to_field_map(setting: &AllSetting) -> Result<Map<String, Value>> {
    match serde_json::to_value(setting) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::Config(format!(
            "Settings serialized to non-object: {}",
            other
        ))),
        Err(e) => Err(Error::Config(format!("Cannot serialize settings: {}", e))),
    }
}

/// Text stored in the `value` column
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a stored value using the type of the field's default
fn parse_field(key: &str, text: &str, default: &Value) -> Result<Value> {
    let parsed = match default {
        Value::String(_) => Some(Value::String(text.to_string())),
        Value::Number(_) => text.trim().parse::<i64>().ok().map(Value::from),
        Value::Bool(_) => text.trim().parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    parsed.ok_or_else(|| Error::Config(format!("Parse setting failed: {} = {:?}", key, text)))
}
