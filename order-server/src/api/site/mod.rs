//! Site Config API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/public/site", get(handler::public_site))
        .route("/api/site", get(handler::admin_site))
        .route("/api/admin/site", put(handler::update_site))
        .route("/api/admin/site/logo", post(handler::upload_logo))
        .route("/api/admin/site/poster", post(handler::upload_poster))
}
