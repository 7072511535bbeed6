//! 认证中间件
//!
//! 保护 /api 下除登录外的所有路由。通过后将 CurrentUser 写入
//! 请求扩展。

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use super::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 不需要认证的路径
fn is_public(path: &str) -> bool {
    !path.starts_with("/api") || path == "/api/auth/login"
}

pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS 预检不带凭证
    if req.method() == Method::OPTIONS || is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            security_log!("warn", "missing_auth_header", path = path.as_str());
            AppError::unauthorized()
        })?;

    let token = JwtService::extract_from_header(header)?;
    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        security_log!("warn", "token_rejected", path = path.as_str());
        e
    })?;

    req.extensions_mut()
        .insert(CurrentUser::from_claims(&claims));
    Ok(next.run(req).await)
}
