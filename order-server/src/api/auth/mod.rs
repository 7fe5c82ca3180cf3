//! Auth API Module
//!
//! Login routes carry a strict per-IP rate limit (brute-force guard).

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::rate_limit;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    let logins = Router::new()
        .route("/api/admin/login", post(handler::admin_login))
        .route("/api/kitchen/login", post(handler::kitchen_login))
        .route("/api/developer/login", post(handler::developer_login))
        .layer(middleware::from_fn_with_state(
            state,
            rate_limit::login_rate_limit,
        ));

    Router::new()
        .merge(logins)
        .route("/api/admin/change-password", post(handler::change_password))
}
