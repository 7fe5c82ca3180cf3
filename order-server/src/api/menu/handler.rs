//! Menu API Handlers
//!
//! Admin create/update arrive as multipart forms (text fields plus an
//! optional image file). Image replacement follows delete-after-
//! confirmed-write: the new file and row update land first, the old
//! file is removed last.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::api::upload;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::menu as menu_repo;
use crate::utils::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{MenuItem, MenuItemCategory, MenuItemCreate, MenuItemUpdate};

/// GET /api/menu - Active items only (public, no auth)
pub async fn list_public(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let items = menu_repo::find_active(&state.pool).await?;
    Ok(ok(items))
}

/// GET /api/admin/menu - Full menu including inactive items (admin)
pub async fn list_admin(
    State(state): State<ServerState>,
    _user: AdminUser,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let items = menu_repo::find_all(&state.pool).await?;
    Ok(ok(items))
}

/// Text fields and image bytes collected from a multipart form
#[derive(Default)]
struct MenuForm {
    name: Option<String>,
    description: Option<String>,
    price_cents: Option<i64>,
    category: Option<MenuItemCategory>,
    is_active: Option<bool>,
    image: Option<(String, Vec<u8>)>,
}

async fn read_menu_form(mut multipart: Multipart) -> Result<MenuForm, AppError> {
    let mut form = MenuForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::validation("Image field needs a filename".to_string()))?;
                let data = field.bytes().await?.to_vec();
                form.image = Some((filename, data));
            }
            "name" => form.name = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "price_cents" => {
                let raw = field.text().await?;
                let value = raw.trim().parse::<i64>().map_err(|_| {
                    AppError::validation(format!("Invalid price_cents: {raw}"))
                })?;
                if value < 0 {
                    return Err(AppError::validation("price_cents must not be negative"));
                }
                form.price_cents = Some(value);
            }
            "category" => {
                let raw = field.text().await?;
                let category = MenuItemCategory::parse(raw.trim()).ok_or_else(|| {
                    AppError::validation(format!("Unknown category: {raw}"))
                })?;
                form.category = Some(category);
            }
            "is_active" => {
                let raw = field.text().await?;
                form.is_active = Some(raw == "true" || raw == "1");
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/admin/menu - Create a menu item (admin, multipart)
pub async fn create(
    State(state): State<ServerState>,
    _user: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let form = read_menu_form(multipart).await?;

    let name = form
        .name
        .ok_or_else(|| AppError::validation("name is required".to_string()))?;
    validate_required_text(&name, "name", MAX_NAME_LEN)?;

    let description = form.description.unwrap_or_default();
    if description.len() > MAX_TEXT_LEN {
        return Err(AppError::validation("description is too long".to_string()));
    }

    let price_cents = form
        .price_cents
        .ok_or_else(|| AppError::validation("price_cents is required".to_string()))?;
    let category = form
        .category
        .ok_or_else(|| AppError::validation("category is required".to_string()))?;

    let image = match &form.image {
        Some((filename, data)) => Some(upload::save_image(&state, data, filename)?),
        None => None,
    };

    let item = menu_repo::create(
        &state.pool,
        MenuItemCreate {
            name,
            description,
            price_cents,
            category,
            is_active: form.is_active.unwrap_or(true),
            image,
        },
        chrono::Utc::now().timestamp_millis(),
    )
    .await?;

    tracing::info!(item_id = item.id, name = %item.name, "Menu item created");
    Ok(ok(item))
}

/// PUT /api/admin/menu/{id} - Update a menu item (admin, multipart)
pub async fn update(
    State(state): State<ServerState>,
    _user: AdminUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let form = read_menu_form(multipart).await?;

    if let Some(name) = &form.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    // Save the replacement image first; the old file goes away only after
    // the row update is confirmed
    let previous_image = match &form.image {
        Some(_) => menu_repo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?
            .image,
        None => None,
    };

    let new_image = match &form.image {
        Some((filename, data)) => Some(upload::save_image(&state, data, filename)?),
        None => None,
    };

    let item = menu_repo::update(
        &state.pool,
        id,
        MenuItemUpdate {
            name: form.name,
            description: form.description,
            price_cents: form.price_cents,
            category: form.category,
            is_active: form.is_active,
            image: new_image.clone(),
        },
    )
    .await?;

    if let Some(old) = previous_image
        && new_image.is_some()
        && Some(&old) != new_image.as_ref()
    {
        upload::delete_image(&state, &old);
    }

    tracing::info!(item_id = id, "Menu item updated");
    Ok(ok(item))
}

/// DELETE /api/admin/menu/{id} - Delete a menu item (admin)
pub async fn delete(
    State(state): State<ServerState>,
    _user: AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let image = menu_repo::delete(&state.pool, id).await?;
    if let Some(path) = image {
        upload::delete_image(&state, &path);
    }
    tracing::info!(item_id = id, "Menu item deleted");
    Ok(ok(true))
}
