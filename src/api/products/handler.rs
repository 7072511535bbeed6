//! 商品 CRUD
//!
//! 删除为软删除，历史订单仍引用商品记录。图片替换/移除时
//! 清理旧文件。

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{CategoryRepository, ProductRepository, SupplierRepository};
use crate::services::upload_store::UploadStore;
use crate::utils::error::{ok, ok_with_message};
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> ProductRepository {
    ProductRepository::new(state.get_db())
}

/// GET /api/products — 未删除商品，最新在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/products/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    // 引用完整性：分类与供应商必须存在
    CategoryRepository::new(state.get_db())
        .find_by_id(&payload.category.to_string())
        .await?;
    SupplierRepository::new(state.get_db())
        .find_by_id(&payload.supplier.to_string())
        .await?;
    Ok(ok(repo(&state).create(payload).await?))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let repo = repo(&state);
    let existing = repo.find_by_id(&id).await?;

    if let Some(category) = &payload.category {
        CategoryRepository::new(state.get_db())
            .find_by_id(&category.to_string())
            .await?;
    }
    if let Some(supplier) = &payload.supplier {
        SupplierRepository::new(state.get_db())
            .find_by_id(&supplier.to_string())
            .await?;
    }

    let remove_image = payload.remove_image.unwrap_or(false);
    let replacing = payload.image.is_some();

    let updated = if remove_image && !replacing {
        repo.update(&id, payload).await?;
        repo.clear_image(&id).await?
    } else {
        repo.update(&id, payload).await?
    };

    if let Some(old) = existing.image {
        if updated.image.as_deref() != Some(old.as_str()) {
            UploadStore::new(state.uploads_dir()).delete(&old)?;
        }
    }
    Ok(ok(updated))
}

/// DELETE /api/products/{id} — 软删除
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    Ok(ok_with_message(
        repo(&state).soft_delete(&id).await?,
        "Product deleted",
    ))
}
