use sqlx::SqlitePool;

use crate::models::user::AdminUser;
use crate::utils::error::{AppError, AppResult};
use crate::utils::password;

/// Credential store backing the session login.
#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_tables(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to create admin_users table: {e}")))?;

        Ok(())
    }

    /// Makes sure the configured admin account exists, hashing the configured
    /// password. An existing row is left alone so a rotated env password only
    /// applies to fresh databases.
    pub async fn ensure_admin(&self, username: &str, plain_password: &str) -> AppResult<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to check admin user: {e}")))?;

        if existing > 0 {
            return Ok(());
        }

        let hash = password::hash_password(plain_password)?;
        sqlx::query("INSERT INTO admin_users (username, password_hash, role) VALUES (?, ?, 'admin')")
            .bind(username)
            .bind(&hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to seed admin user: {e}")))?;

        log::info!("seeded admin account '{username}'");
        Ok(())
    }

    /// Checks a credential pair against the store.
    pub async fn verify(&self, username: &str, plain_password: &str) -> AppResult<AdminUser> {
        let user = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to fetch admin user: {e}")))?
            .ok_or(AppError::InvalidCredentials)?;

        if password::verify_password(plain_password, &user.password_hash)? {
            Ok(user)
        } else {
            log::warn!("failed login attempt for '{username}'");
            Err(AppError::InvalidCredentials)
        }
    }
}
