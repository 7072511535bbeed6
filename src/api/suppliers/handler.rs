use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::db::repository::{RepoError, SupplierRepository};
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> SupplierRepository {
    SupplierRepository::new(state.get_db())
}

/// GET /api/suppliers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Supplier>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/suppliers/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Supplier>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/suppliers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<Json<AppResponse<Supplier>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/suppliers/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SupplierUpdate>,
) -> AppResult<Json<AppResponse<Supplier>>> {
    Ok(ok(repo(&state).update(&id, payload).await?))
}

/// DELETE /api/suppliers/{id}
///
/// 仍被商品或物料引用时返回 409。
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Supplier>>> {
    let deleted = repo(&state).delete(&id).await.map_err(|e| match e {
        RepoError::Validation(msg) => AppError::Conflict(msg),
        other => other.into(),
    })?;
    Ok(ok_with_message(deleted, "Supplier deleted"))
}
