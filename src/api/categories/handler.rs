use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> CategoryRepository {
    CategoryRepository::new(state.get_db())
}

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/categories/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Category>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    Ok(ok(repo(&state).update(&id, payload).await?))
}

/// DELETE /api/categories/{id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Category>>> {
    Ok(ok_with_message(
        repo(&state).delete(&id).await?,
        "Category deleted",
    ))
}
