//! Menu Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

const MENU_COLUMNS: &str =
    "id, name, description, price_cents, category, is_active, image, created_at";

/// Active items only (the public customer menu)
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items: Vec<MenuItem> = sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM menu_item WHERE is_active = 1 ORDER BY category, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Full menu including inactive items (the admin view)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items: Vec<MenuItem> = sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM menu_item ORDER BY category, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item: Option<MenuItem> =
        sqlx::query_as(&format!("SELECT {MENU_COLUMNS} FROM menu_item WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(item)
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate, now: i64) -> RepoResult<MenuItem> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_item (name, description, price_cents, category, is_active, image, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(data.category)
    .bind(data.is_active)
    .bind(&data.image)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_item SET \
             name = COALESCE(?1, name), \
             description = COALESCE(?2, description), \
             price_cents = COALESCE(?3, price_cents), \
             category = COALESCE(?4, category), \
             is_active = COALESCE(?5, is_active), \
             image = COALESCE(?6, image) \
         WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(data.category)
    .bind(data.is_active)
    .bind(&data.image)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Delete an item; returns its image path so the caller can remove the
/// file after the row is gone.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let image: Option<Option<String>> =
        sqlx::query_scalar("SELECT image FROM menu_item WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let Some(image) = image else {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    };

    sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(image)
}
