//! Payment API Module
//!
//! `initiate` is a public customer action; the webhook is unauthenticated
//! but gateway-only (it validates the order reference before mutating
//! anything and never leaks state in its response).

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/payment/initiate", post(handler::initiate))
        .route("/api/payment/webhook", post(handler::webhook))
}
