use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Staff, StaffCreate, StaffUpdate};
use crate::db::repository::StaffRepository;
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> StaffRepository {
    StaffRepository::new(state.get_db())
}

/// GET /api/staff — 最新在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Staff>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/staff/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Staff>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/staff
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<AppResponse<Staff>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/staff/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<AppResponse<Staff>>> {
    Ok(ok(repo(&state).update(&id, payload).await?))
}

/// DELETE /api/staff/{id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Staff>>> {
    Ok(ok_with_message(
        repo(&state).delete(&id).await?,
        "Staff deleted",
    ))
}
