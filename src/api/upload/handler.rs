//! 图片上传
//!
//! PNG/JPEG/WebP 统一转 JPEG 存储，内容哈希命名去重。
//! 返回的相对路径可直接写进商品/厨师记录，经 /uploads/ 访问。

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::core::ServerState;
use crate::services::upload_store::UploadStore;
use crate::utils::error::ok;
use crate::utils::{AppError, AppResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub path: String,
    pub url: String,
}

/// POST /api/upload/image (multipart, `file` 域)
pub async fn upload_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<UploadResult>>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await?;
        let path = UploadStore::new(state.uploads_dir()).save_image(&bytes)?;
        let url = format!("/uploads/{path}");
        return Ok(ok(UploadResult { path, url }));
    }
    Err(AppError::validation("Missing 'file' field"))
}
