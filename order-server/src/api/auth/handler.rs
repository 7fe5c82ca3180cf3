//! Authentication Handlers
//!
//! Three independent role logins: admin (argon2 hash comparison),
//! kitchen (fixed PIN), developer (fixed credentials). All yield a
//! time-boxed signed token consumed as `Authorization: Bearer <token>`.

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::{AdminUser, Role};
use crate::core::ServerState;
use crate::db::repository::admin_user;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::client::{ChangePasswordRequest, KitchenLoginRequest, LoginRequest, LoginResponse};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/admin/login
///
/// Authenticates admin credentials and returns a JWT token
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let user = admin_user::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(username = %req.username, "Admin login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(username = %req.username, "Admin login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(Role::Admin, Some(user.id))
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin logged in");

    Ok(ok(LoginResponse {
        token,
        role: Role::Admin.as_str().to_string(),
    }))
}

/// POST /api/kitchen/login
///
/// Fixed-PIN comparison; the token carries no per-user identity
pub async fn kitchen_login(
    State(state): State<ServerState>,
    Json(req): Json<KitchenLoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if req.pin != state.config.kitchen_pin {
        tracing::warn!("Kitchen login failed - invalid PIN");
        return Err(AppError::invalid("Invalid PIN".to_string()));
    }

    let token = state
        .jwt_service
        .generate_token(Role::Kitchen, None)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!("Kitchen display logged in");

    Ok(ok(LoginResponse {
        token,
        role: Role::Kitchen.as_str().to_string(),
    }))
}

/// POST /api/developer/login
pub async fn developer_login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if req.username != state.config.developer_user || req.password != state.config.developer_pass {
        tracing::warn!(username = %req.username, "Developer login failed");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(Role::Developer, None)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!("Developer logged in");

    Ok(ok(LoginResponse {
        token,
        role: Role::Developer.as_str().to_string(),
    }))
}

/// POST /api/admin/change-password
pub async fn change_password(
    State(state): State<ServerState>,
    AdminUser(user): AdminUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    validate_required_text(&req.new_password, "new password", MAX_PASSWORD_LEN)?;

    let admin_id = user
        .id
        .ok_or_else(|| AppError::invalid("Token carries no admin identity".to_string()))?;

    let admin = admin_user::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Admin user {admin_id}")))?;

    let current_valid = admin
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !current_valid {
        return Err(AppError::invalid("Incorrect current password".to_string()));
    }

    let new_hash = admin_user::AdminUser::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    admin_user::update_password(&state.pool, admin_id, &new_hash).await?;

    tracing::info!(user_id = admin_id, "Admin password changed");

    Ok(ok(true))
}
