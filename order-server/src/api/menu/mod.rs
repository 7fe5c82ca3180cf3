//! Menu API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(handler::list_public))
        .route(
            "/api/admin/menu",
            get(handler::list_admin).post(handler::create),
        )
        .route(
            "/api/admin/menu/{id}",
            put(handler::update).delete(handler::delete),
        )
}
