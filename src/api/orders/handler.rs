//! 下单与订单查询
//!
//! 身份与角色一律取自 JWT：admin 看全部订单，其余角色只看
//! 自己的。下单人同样来自令牌，请求体只带商品行。

use axum::Json;
use axum::extract::State;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderWithUser};
use crate::db::repository::{parse_id, OrderRepository};
use crate::orders::{OrderProcessor, OrderRequest};
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

/// POST /api/orders — 原子下单
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(request): Json<OrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user_id = parse_id("user", &user.id)
        .map_err(|_| AppError::invalid_token("Malformed subject"))?;
    let order = OrderProcessor::new(state.get_db())
        .place_order(user_id, request)
        .await?;
    Ok(ok_with_message(order, "Order placed"))
}

/// GET /api/orders — 角色敏感的订单列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<OrderWithUser>>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = if user.is_admin() {
        repo.find_all_with_users(None).await?
    } else {
        let user_id = parse_id("user", &user.id)
            .map_err(|_| AppError::invalid_token("Malformed subject"))?;
        repo.find_all_with_users(Some(&user_id)).await?
    };
    Ok(ok(orders))
}
