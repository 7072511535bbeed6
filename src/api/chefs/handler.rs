//! 厨师 CRUD
//!
//! 头像替换/移除时删除旧文件，避免 uploads 目录积攒孤儿文件。

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Chef, ChefCreate, ChefUpdate};
use crate::db::repository::ChefRepository;
use crate::services::upload_store::UploadStore;
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> ChefRepository {
    ChefRepository::new(state.get_db())
}

/// GET /api/chefs
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Chef>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/chefs/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Chef>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/chefs
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ChefCreate>,
) -> AppResult<Json<AppResponse<Chef>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/chefs/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ChefUpdate>,
) -> AppResult<Json<AppResponse<Chef>>> {
    let repo = repo(&state);
    let existing = repo.find_by_id(&id).await?;
    let store = UploadStore::new(state.uploads_dir());

    let remove_picture = payload.remove_picture.unwrap_or(false);
    let replacing = payload.profile_picture.is_some();

    let updated = if remove_picture && !replacing {
        repo.update(&id, payload).await?;
        repo.clear_picture(&id).await?
    } else {
        repo.update(&id, payload).await?
    };

    // 旧头像被替换或移除后清理文件
    if let Some(old) = existing.profile_picture {
        if updated.profile_picture.as_deref() != Some(old.as_str()) {
            store.delete(&old)?;
        }
    }
    Ok(ok(updated))
}

/// DELETE /api/chefs/{id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Chef>>> {
    let deleted = repo(&state).delete(&id).await?;
    if let Some(picture) = &deleted.profile_picture {
        UploadStore::new(state.uploads_dir()).delete(picture)?;
    }
    Ok(ok_with_message(deleted, "Chef deleted"))
}
