//! Site Config API Handlers
//!
//! Branding data lives in a singleton row. The public read feeds the
//! landing page; the authenticated variants are for the admin panel.

use axum::{
    Json,
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
};

use crate::api::upload;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::site_config;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{SiteConfig, SiteConfigUpdate};

/// GET /api/public/site - Branding info (public, no auth)
pub async fn public_site(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<SiteConfig>>> {
    let config = site_config::get(&state.pool).await?;
    Ok(ok(config))
}

/// GET /api/site - Branding info for the admin panel (admin)
///
/// Marked no-store so the panel never shows a stale cached copy after an
/// edit.
pub async fn admin_site(
    State(state): State<ServerState>,
    _user: AdminUser,
) -> AppResult<impl IntoResponse> {
    let config = site_config::get(&state.pool).await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], ok(config)))
}

/// PUT /api/admin/site - Update branding fields (admin)
pub async fn update_site(
    State(state): State<ServerState>,
    _user: AdminUser,
    Json(req): Json<SiteConfigUpdate>,
) -> AppResult<Json<AppResponse<SiteConfig>>> {
    validate_optional_text(&req.brand_name, "brand name", MAX_NAME_LEN)?;
    validate_optional_text(&req.daily_special, "daily special", MAX_TEXT_LEN)?;
    validate_optional_text(&req.address, "address", MAX_TEXT_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.operating_hours, "operating hours", MAX_SHORT_TEXT_LEN)?;

    let config = site_config::update(&state.pool, req).await?;
    tracing::info!("Site config updated");
    Ok(ok(config))
}

/// Pull the single image file out of a multipart request
async fn read_image_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("image") || name.as_deref() == Some("file") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::validation("No filename provided".to_string()))?;
            let data = field.bytes().await?.to_vec();
            return Ok((filename, data));
        }
    }
    Err(AppError::validation("No file uploaded".to_string()))
}

/// POST /api/admin/site/logo - Replace the shop logo (admin)
pub async fn upload_logo(
    State(state): State<ServerState>,
    _user: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<SiteConfig>>> {
    let (filename, data) = read_image_field(multipart).await?;
    let path = upload::save_image(&state, &data, &filename)?;

    // New file and row first, old file last
    let old = site_config::set_logo_path(&state.pool, &path).await?;
    if let Some(old) = old
        && old != path
    {
        upload::delete_image(&state, &old);
    }

    let config = site_config::get(&state.pool).await?;
    tracing::info!(path = %path, "Logo updated");
    Ok(ok(config))
}

/// POST /api/admin/site/poster - Replace the landing poster (admin)
pub async fn upload_poster(
    State(state): State<ServerState>,
    _user: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<SiteConfig>>> {
    let (filename, data) = read_image_field(multipart).await?;
    let path = upload::save_image(&state, &data, &filename)?;

    let old = site_config::set_poster_path(&state.pool, &path).await?;
    if let Some(old) = old
        && old != path
    {
        upload::delete_image(&state, &old);
    }

    let config = site_config::get(&state.pool).await?;
    tracing::info!(path = %path, "Landing poster updated");
    Ok(ok(config))
}
