//! 请求提取器
//!
//! require_auth 中间件校验通过后把 CurrentUser 放进请求扩展，
//! handler 直接以参数形式取用。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::Claims;
use crate::utils::AppError;

/// 当前已认证用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// "user:xxx"
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            username: claims.username.clone(),
            name: claims.name.clone(),
            role: claims.role.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
