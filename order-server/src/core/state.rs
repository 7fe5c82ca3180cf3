//! 服务器状态

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RateLimiter};
use crate::core::Config;
use crate::core::config::DEFAULT_BRAND_NAME;
use crate::db::DbService;
use crate::db::repository::{admin_user, site_config};
use crate::payment::PaymentGateway;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是服务的核心数据结构。使用 Arc / 连接池实现浅拷贝，
/// 每个请求克隆的成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 (订单存储唯一共享可变资源) |
/// | jwt_service | JWT 认证服务 |
/// | gateway | 支付网关适配器 |
/// | rate_limiter | 登录/全局限流器 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 支付网关适配器
    pub gateway: PaymentGateway,
    /// 限流器
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (迁移在 DbService::new 中执行)
    /// 3. 种子数据 (初始管理员、站点配置单行)
    /// 4. 各服务 (JWT、支付网关、限流器)
    ///
    /// # Panics
    ///
    /// 数据库初始化或种子数据写入失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        // Seed bootstrap rows (no-ops when they already exist)
        admin_user::seed_default(&pool, &config.admin_user, &config.admin_pass)
            .await
            .expect("Failed to seed admin account");
        site_config::seed_default(&pool, DEFAULT_BRAND_NAME)
            .await
            .expect("Failed to seed site config");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let gateway = PaymentGateway::new(config.gateway.clone());
        let rate_limiter = RateLimiter::new();

        Self {
            config: config.clone(),
            pool,
            jwt_service,
            gateway,
            rate_limiter,
        }
    }

    /// 启动后台任务
    ///
    /// - 限流器每小时清理过期窗口，防止 IP 表无限增长
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}
