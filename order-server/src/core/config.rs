//! 服务器配置
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | WORK_DIR | ./data | 工作目录 (数据库、上传文件、日志) |
//! | HTTP_PORT | 4000 | HTTP 服务端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | ADMIN_USER / ADMIN_PASS | admin / admin123 | 初始管理员账号 |
//! | KITCHEN_PIN | 1234 | 厨房登录 PIN |
//! | DEVELOPER_USER / DEVELOPER_PASS | dev / dev123 | 开发者账号 |
//! | JWT_SECRET | (自动生成) | JWT 密钥 |
//! | GATEWAY_SECRET | (未设置 = mock 模式) | 支付网关密钥 |
//!
//! # 示例
//!
//! ```ignore
//! WORK_DIR=/data/orders HTTP_PORT=8080 cargo run
//! ```

use crate::auth::JwtConfig;
use crate::payment::GatewayConfig;
use std::path::PathBuf;

/// Default brand used when seeding an empty site_config table
pub const DEFAULT_BRAND_NAME: &str = "Pak Awi Nasi Ayam";

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、上传文件、日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 初始凭据 ===
    /// 初始管理员用户名
    pub admin_user: String,
    /// 初始管理员密码 (仅在账号不存在时使用)
    pub admin_pass: String,
    /// 厨房 PIN
    pub kitchen_pin: String,
    /// 开发者用户名
    pub developer_user: String,
    /// 开发者密码
    pub developer_pass: String,

    /// 支付网关配置
    pub gateway: GatewayConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            admin_user: std::env::var("ADMIN_USER").unwrap_or_else(|_| "admin".into()),
            admin_pass: std::env::var("ADMIN_PASS").unwrap_or_else(|_| "admin123".into()),
            kitchen_pin: std::env::var("KITCHEN_PIN").unwrap_or_else(|_| "1234".into()),
            developer_user: std::env::var("DEVELOPER_USER").unwrap_or_else(|_| "dev".into()),
            developer_pass: std::env::var("DEVELOPER_PASS").unwrap_or_else(|_| "dev123".into()),

            gateway: GatewayConfig::from_env(),
        }
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data.sqlite")
    }

    /// 上传文件目录
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(self.uploads_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
