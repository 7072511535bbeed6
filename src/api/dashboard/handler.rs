use axum::Json;
use axum::extract::State;

use crate::core::ServerState;
use crate::db::repository::reports::DashboardSummary;
use crate::db::repository::ReportsRepository;
use crate::utils::error::ok;
use crate::utils::time::now_millis;
use crate::utils::{AppResponse, AppResult};

/// GET /api/dashboard — 按请求时刻的 UTC 日/月边界聚合
pub async fn summary(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<DashboardSummary>>> {
    let summary = ReportsRepository::new(state.get_db())
        .dashboard(now_millis())
        .await?;
    Ok(ok(summary))
}
