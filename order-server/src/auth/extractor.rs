//! JWT Extractors
//!
//! Capability-typed extractors for protected handlers. A handler that
//! takes [`AdminUser`] can only run with a verified admin token; one that
//! takes [`KitchenUser`] accepts kitchen or admin. All of them go through
//! the same authorization gate; there are no per-route role conditionals
//! anywhere else.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService, Role, jwt::JwtError};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// The one authorization gate: extract the bearer token, validate it,
/// check the embedded role against the operation's minimum role.
async fn authorize(
    parts: &mut Parts,
    state: &ServerState,
    required: Role,
) -> Result<CurrentUser, AppError> {
    // Reuse a user already extracted for this request
    let user = match parts.extensions.get::<CurrentUser>() {
        Some(user) => user.clone(),
        None => {
            let auth_header = parts
                .headers
                .get(http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            let token = match auth_header {
                Some(header) => JwtService::extract_from_header(header).ok_or_else(|| {
                    security_log!("WARN", "auth_malformed", uri = format!("{:?}", parts.uri));
                    AppError::invalid_token()
                })?,
                None => {
                    security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                    return Err(AppError::unauthorized());
                }
            };

            let claims = state.jwt_service.validate_token(token).map_err(|e| {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                match e {
                    JwtError::ExpiredToken => AppError::token_expired(),
                    _ => AppError::invalid_token(),
                }
            })?;

            let user = CurrentUser::from(claims);
            parts.extensions.insert(user.clone());
            user
        }
    };

    if !user.role.satisfies(required) {
        security_log!(
            "WARN",
            "role_denied",
            user_role = user.role.as_str(),
            required_role = required.as_str(),
            uri = format!("{:?}", parts.uri)
        );
        return Err(AppError::forbidden(format!("Requires {required} role")));
    }

    Ok(user)
}

/// Requires role = admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Admin).await.map(Self)
    }
}

/// Requires role = kitchen OR admin
#[derive(Debug, Clone)]
pub struct KitchenUser(pub CurrentUser);

impl FromRequestParts<ServerState> for KitchenUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Kitchen).await.map(Self)
    }
}
