use axum::Json;
use serde_json::{json, Value};

use crate::utils::time::now_millis;

/// GET /health — 存活探针，无需认证
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": now_millis(),
    }))
}
