//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 三种角色的登录接口
//! - [`menu`] - 菜单查询和管理接口
//! - [`orders`] - 订单创建、查询、状态推进接口
//! - [`site`] - 站点品牌配置接口
//! - [`payment`] - 支付网关接入和回调
//! - [`upload`] - 图片保存/删除辅助函数 (无路由)

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payment;
pub mod site;
pub mod upload;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit;
use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(menu::router())
        .merge(orders::router())
        .merge(site::router())
        .merge(payment::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::global_rate_limit,
        ))
        .nest_service("/uploads", ServeDir::new(state.config.uploads_dir()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
