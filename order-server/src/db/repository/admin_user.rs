//! Admin User Repository

use super::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Admin user row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl AdminUser {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<AdminUser>> {
    let user: Option<AdminUser> = sqlx::query_as(
        "SELECT id, username, password_hash FROM admin_user WHERE username = ? LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AdminUser>> {
    let user: Option<AdminUser> =
        sqlx::query_as("SELECT id, username, password_hash FROM admin_user WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE admin_user SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin user {id} not found")));
    }
    Ok(())
}

/// Create the bootstrap admin account if it does not exist yet
pub async fn seed_default(pool: &SqlitePool, username: &str, password: &str) -> RepoResult<()> {
    if find_by_username(pool, username).await?.is_some() {
        return Ok(());
    }
    let hash = AdminUser::hash_password(password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
    sqlx::query("INSERT INTO admin_user (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(&hash)
        .execute(pool)
        .await?;
    tracing::info!(username = %username, "Seeded default admin account");
    Ok(())
}
