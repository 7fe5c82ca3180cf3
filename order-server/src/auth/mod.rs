//! 认证模块
//!
//! JWT 签发/验证、角色门禁和登录限流。
//!
//! 三种独立角色各有自己的登录方式：
//! - admin: 用户名 + argon2 密码哈希
//! - kitchen: 固定 PIN
//! - developer: 固定账号密码
//!
//! 所有受保护操作通过同一个授权门禁检查，处理函数用能力类型
//! ([`AdminUser`] / [`KitchenUser`]) 声明所需角色，不在各路由里
//! 散落角色判断。

pub mod extractor;
pub mod jwt;
pub mod rate_limit;

pub use extractor::{AdminUser, KitchenUser};
pub use jwt::{Claims, JwtConfig, JwtService};
pub use rate_limit::RateLimiter;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Kitchen,
    Developer,
}

impl Role {
    /// Whether this role meets an operation's minimum role.
    ///
    /// Admin satisfies kitchen operations; everything else is an exact
    /// match. Developer is its own silo.
    pub fn satisfies(self, required: Role) -> bool {
        self == required || (self == Role::Admin && required == Role::Kitchen)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Kitchen => "kitchen",
            Role::Developer => "developer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展；处理函数通过
/// `Extension<CurrentUser>` 获取，而不是从全局状态读取。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Admin user id for admin tokens; None for kitchen/developer tokens
    /// (those roles have no per-user identity)
    pub id: Option<i64>,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_satisfies_kitchen() {
        assert!(Role::Admin.satisfies(Role::Kitchen));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Kitchen.satisfies(Role::Kitchen));
        assert!(!Role::Kitchen.satisfies(Role::Admin));
        assert!(!Role::Developer.satisfies(Role::Admin));
        assert!(!Role::Developer.satisfies(Role::Kitchen));
        assert!(!Role::Admin.satisfies(Role::Developer));
    }
}
