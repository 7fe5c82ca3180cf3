//! Order Server - 餐厅自助点餐后端
//!
//! # 架构概述
//!
//! 本模块是自助点餐系统的服务端，提供以下核心功能：
//!
//! - **订单存储** (`db`): SQLite (WAL) 持久化订单、菜单、站点配置
//! - **订单状态机** (`shared::order`): NEW → PREPARING → READY → COMPLETED
//! - **认证** (`auth`): JWT + Argon2，三种独立角色 (admin/kitchen/developer)
//! - **支付网关** (`payment`): 托管账单接入 + mock 模式
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色门禁、限流
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── payment/       # 支付网关适配器
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
