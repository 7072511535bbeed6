//! JWT 签发与校验
//!
//! HS256。secret 来自 JWT_SECRET 环境变量；未设置时生成随机
//! secret (重启后旧 token 全部失效，仅适合开发环境)。

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token 有效期 (小时)
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, generating a volatile secret");
            generate_secret()
        });
        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
        }
    }
}

fn generate_secret() -> String {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    // SystemRandom 失败意味着系统熵源不可用，无法继续
    rng.fill(&mut bytes)
        .unwrap_or_else(|_| panic!("system RNG unavailable"));
    hex::encode(bytes)
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id ("user:xxx")
    pub sub: String,
    pub username: String,
    pub name: String,
    pub role: String,
    /// 过期时间 (Unix 秒)
    pub exp: i64,
    /// 签发时间 (Unix 秒)
    pub iat: i64,
}

/// JWT 服务
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiration_hours: config.expiration_hours,
        }
    }

    /// 为用户签发 token
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        name: &str,
        role: &str,
    ) -> AppResult<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expiration_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))
    }

    /// 校验 token 并取出 claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
                _ => AppError::invalid_token(e.to_string()),
            })
    }

    /// 从 "Bearer xxx" 头里取出 token
    pub fn extract_from_header(header: &str) -> AppResult<&str> {
        header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::invalid_token("Missing Bearer prefix"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
        })
    }

    #[test]
    fn round_trip() {
        let svc = service();
        let token = svc
            .generate_token("user:amy", "amy", "Amy", "user")
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user:amy");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_rejected() {
        let svc = service();
        let token = svc
            .generate_token("user:amy", "amy", "Amy", "user")
            .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(svc.validate_token(&tampered).is_err());
    }

    #[test]
    fn bearer_prefix_required() {
        assert!(JwtService::extract_from_header("Bearer abc").is_ok());
        assert!(JwtService::extract_from_header("abc").is_err());
    }
}
