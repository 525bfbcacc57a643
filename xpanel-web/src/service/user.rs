//! User service over the `users` table

use crate::entity::User;
use sqlx::SqlitePool;
use tracing::info;
use xpanel_common::{Error, Result};

/// Credentials seeded into an empty `users` table
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";

#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look up the user matching both username and password
    pub async fn check_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT id, username, password FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(id, username, password)| User {
            id,
            username,
            password,
        }))
    }

    /// Replace the credentials of user `id`
    pub async fn update_user(&self, id: i64, username: &str, password: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET username = ?, password = ? WHERE id = ?")
            .bind(username)
            .bind(password)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user {} not found", id)));
        }

        info!(user_id = id, "User credentials updated");
        Ok(())
    }

    /// Seed the default admin account when no user exists
    pub async fn ensure_default_user(&self) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        if count > 0 {
            return Ok(());
        }

        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(DEFAULT_USERNAME)
            .bind(DEFAULT_PASSWORD)
            .execute(&self.db)
            .await?;

        info!("Created default user '{}'", DEFAULT_USERNAME);
        Ok(())
    }
}
