//! Orders API Module
//!
//! Order creation is public (customer action); listing, status updates
//! and the bulk clear are role-gated through the extractor types in the
//! handlers.

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/orders",
            get(handler::list_all).post(handler::create),
        )
        .route("/api/kitchen/orders", get(handler::list_active))
        .route("/api/orders/{id}/status", patch(handler::update_status))
        .route("/api/admin/orders", delete(handler::clear_all))
}
