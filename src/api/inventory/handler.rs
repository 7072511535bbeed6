use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use crate::db::repository::{InventoryRepository, SupplierRepository};
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> InventoryRepository {
    InventoryRepository::new(state.get_db())
}

/// GET /api/inventory
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<InventoryItem>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/inventory/low-stock — quantity < min_stock_level
pub async fn low_stock(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<InventoryItem>>>> {
    Ok(ok(repo(&state).find_low_stock().await?))
}

/// GET /api/inventory/category/{category}
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> AppResult<Json<AppResponse<Vec<InventoryItem>>>> {
    Ok(ok(repo(&state).find_by_category(&category).await?))
}

/// GET /api/inventory/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<InventoryItem>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<AppResponse<InventoryItem>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    SupplierRepository::new(state.get_db())
        .find_by_id(&payload.supplier.to_string())
        .await?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/inventory/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<Json<AppResponse<InventoryItem>>> {
    if let Some(supplier) = &payload.supplier {
        SupplierRepository::new(state.get_db())
            .find_by_id(&supplier.to_string())
            .await?;
    }
    Ok(ok(repo(&state).update(&id, payload).await?))
}

/// DELETE /api/inventory/{id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<InventoryItem>>> {
    Ok(ok_with_message(
        repo(&state).delete(&id).await?,
        "Inventory item deleted",
    ))
}
