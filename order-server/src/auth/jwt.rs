//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CurrentUser, Role};

/// Token lifetime for admin and kitchen sessions (minutes)
pub const STAFF_TOKEN_MINUTES: i64 = 8 * 60;

/// Token lifetime for developer sessions (minutes)
pub const DEVELOPER_TOKEN_MINUTES: i64 = 2 * 60;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "order-panels".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id, or the role name for roles without per-user identity
    pub sub: String,
    /// 角色
    pub role: Role,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 从环境变量加载 JWT 密钥
///
/// 未设置时生成一个随机开发密钥 — 每次启动都会让旧令牌失效，
/// 生产环境必须显式配置 JWT_SECRET。
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            tracing::warn!("JWT_SECRET is shorter than 32 bytes; generating a temporary key");
            generate_printable_secret()
        }
        Err(_) => {
            tracing::warn!("JWT_SECRET not set! Generating temporary key for development.");
            generate_printable_secret()
        }
    }
}

/// 生成可打印的随机密钥 (64 字符)
fn generate_printable_secret() -> String {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // 随机数生成失败时退回固定开发密钥
        return "order-server-development-fallback-key-0000".to_string();
    }
    bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为指定角色签发令牌
    ///
    /// admin/kitchen 8 小时，developer 2 小时。
    pub fn generate_token(&self, role: Role, user_id: Option<i64>) -> Result<String, JwtError> {
        let minutes = match role {
            Role::Developer => DEVELOPER_TOKEN_MINUTES,
            _ => STAFF_TOKEN_MINUTES,
        };

        let now = Utc::now();
        let expiration = now + Duration::minutes(minutes);

        let claims = Claims {
            sub: user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| role.as_str().to_string()),
            role,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub.parse().ok(),
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-key-that-is-long-enough".into(),
            issuer: "order-server".into(),
            audience: "order-panels".into(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token(Role::Admin, Some(7))
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Admin);

        let user = CurrentUser::from(claims);
        assert_eq!(user.id, Some(7));
        assert!(user.is_admin());
    }

    #[test]
    fn test_kitchen_token_has_no_user_id() {
        let service = test_service();
        let token = service.generate_token(Role::Kitchen, None).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "kitchen");
        let user = CurrentUser::from(claims);
        assert_eq!(user.id, None);
        assert_eq!(user.role, Role::Kitchen);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = test_service();
        let token = service.generate_token(Role::Admin, Some(1)).unwrap();

        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-key-here!!".into(),
            issuer: "order-server".into(),
            audience: "order-panels".into(),
        });
        assert!(other.validate_token(&token).is_err());
    }
}
