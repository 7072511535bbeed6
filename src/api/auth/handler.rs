//! 登录处理
//!
//! 登录失败统一返回同一错误消息，并固定延迟响应，避免
//! 用户名枚举与时序侧信道。

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::error::ok;
use crate::utils::{AppError, AppResponse, AppResult};

/// 登录失败的固定响应延迟
const LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub name: String,
    pub role: String,
}

async fn fail_slow() -> AppError {
    tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
    AppError::invalid_credentials()
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let users = UserRepository::new(state.get_db());
    let user = match users.find_by_username(&payload.username).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => {
            security_log!("warn", "login_unknown_user", username = payload.username.as_str());
            return Err(fail_slow().await);
        }
        Err(e) => return Err(e.into()),
    };

    let verified = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        security_log!("warn", "login_bad_password", username = payload.username.as_str());
        return Err(fail_slow().await);
    }

    let user_id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("User record without id"))?;
    let token = state.jwt_service.generate_token(
        &user_id,
        &user.username,
        &user.name,
        user.role.as_str(),
    )?;

    security_log!("info", "login_success", username = user.username.as_str());
    Ok(ok(LoginResponse {
        token,
        user_id,
        username: user.username,
        name: user.name,
        role: user.role.as_str().to_string(),
    }))
}

/// GET /api/auth/me — 当前用户信息
pub async fn me(user: CurrentUser) -> Json<AppResponse<CurrentUserInfo>> {
    ok(CurrentUserInfo {
        id: user.id,
        username: user.username,
        name: user.name,
        role: user.role,
    })
}

#[derive(Debug, Serialize)]
pub struct CurrentUserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: String,
}
