//! Site Config Repository
//!
//! Single-row table (id = 1); [`get`] always returns a row because
//! startup seeds the default.

use super::{RepoError, RepoResult};
use shared::models::{SiteConfig, SiteConfigUpdate};
use sqlx::SqlitePool;

const SITE_COLUMNS: &str = "id, brand_name, daily_special, logo_path, landing_poster_path, \
     address, phone, operating_hours";

pub async fn get(pool: &SqlitePool) -> RepoResult<SiteConfig> {
    let config: Option<SiteConfig> =
        sqlx::query_as(&format!("SELECT {SITE_COLUMNS} FROM site_config WHERE id = 1"))
            .fetch_optional(pool)
            .await?;
    config.ok_or_else(|| RepoError::NotFound("Site config not seeded".into()))
}

/// Insert the default row if the table is empty (startup seeding)
pub async fn seed_default(pool: &SqlitePool, brand_name: &str) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO site_config (id, brand_name) VALUES (1, ?)")
        .bind(brand_name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, data: SiteConfigUpdate) -> RepoResult<SiteConfig> {
    sqlx::query(
        "UPDATE site_config SET \
             brand_name = COALESCE(?1, brand_name), \
             daily_special = COALESCE(?2, daily_special), \
             address = COALESCE(?3, address), \
             phone = COALESCE(?4, phone), \
             operating_hours = COALESCE(?5, operating_hours) \
         WHERE id = 1",
    )
    .bind(&data.brand_name)
    .bind(&data.daily_special)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.operating_hours)
    .execute(pool)
    .await?;
    get(pool).await
}

/// Swap the logo path, returning the previous one so the caller can
/// delete the old file after the new write is confirmed.
pub async fn set_logo_path(pool: &SqlitePool, path: &str) -> RepoResult<Option<String>> {
    let old: Option<Option<String>> =
        sqlx::query_scalar("SELECT logo_path FROM site_config WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    sqlx::query("UPDATE site_config SET logo_path = ? WHERE id = 1")
        .bind(path)
        .execute(pool)
        .await?;
    Ok(old.flatten())
}

/// Swap the landing poster path; same delete-after-confirmed-write contract
pub async fn set_poster_path(pool: &SqlitePool, path: &str) -> RepoResult<Option<String>> {
    let old: Option<Option<String>> =
        sqlx::query_scalar("SELECT landing_poster_path FROM site_config WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    sqlx::query("UPDATE site_config SET landing_poster_path = ? WHERE id = 1")
        .bind(path)
        .execute(pool)
        .await?;
    Ok(old.flatten())
}
