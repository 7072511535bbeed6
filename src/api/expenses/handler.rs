//! 支出 CRUD 与汇总
//!
//! 创建/更新走 multipart：`data` 域是 JSON 负载，`attachments`
//! 域可重复携带文件。更新时新附件整体替换旧附件，旧文件删除。

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use crate::db::repository::reports::{MonthComparison, MonthlyExpenseSummary};
use crate::db::repository::{ExpenseRepository, ReportsRepository};
use crate::services::upload_store::UploadStore;
use crate::utils::error::{ok, ok_with_message};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResponse, AppResult};

fn repo(state: &ServerState) -> ExpenseRepository {
    ExpenseRepository::new(state.get_db())
}

/// multipart 里的单个附件
struct AttachmentUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// multipart 解析结果
struct ExpenseForm {
    data: Option<String>,
    attachments: Vec<AttachmentUpload>,
}

async fn read_form(mut multipart: Multipart) -> AppResult<ExpenseForm> {
    let mut form = ExpenseForm {
        data: None,
        attachments: Vec::new(),
    };
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("data") => {
                form.data = Some(field.text().await?);
            }
            Some("attachments") => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.attachments.push(AttachmentUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }
    Ok(form)
}

fn store_attachments(
    store: &UploadStore,
    attachments: &[AttachmentUpload],
) -> AppResult<Vec<String>> {
    let mut paths = Vec::with_capacity(attachments.len());
    for upload in attachments {
        match store.save_attachment(
            &upload.file_name,
            upload.content_type.as_deref(),
            &upload.bytes,
        ) {
            Ok(path) => paths.push(path),
            Err(e) => {
                // 半途失败时回收已写入的文件
                for path in &paths {
                    let _ = store.delete(path);
                }
                return Err(e);
            }
        }
    }
    Ok(paths)
}

/// GET /api/expenses — 按支出日期倒序
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Expense>>>> {
    Ok(ok(repo(&state).find_all().await?))
}

/// GET /api/expenses/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Expense>>> {
    Ok(ok(repo(&state).find_by_id(&id).await?))
}

/// POST /api/expenses (multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<Expense>>> {
    let form = read_form(multipart).await?;
    let data = form
        .data
        .ok_or_else(|| AppError::validation("Missing 'data' field"))?;
    let payload: ExpenseCreate = serde_json::from_str(&data)
        .map_err(|e| AppError::validation(format!("Invalid expense payload: {e}")))?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let store = UploadStore::new(state.uploads_dir());
    let paths = store_attachments(&store, &form.attachments)?;

    match repo(&state).create(payload, paths.clone()).await {
        Ok(expense) => Ok(ok(expense)),
        Err(e) => {
            for path in &paths {
                let _ = store.delete(path);
            }
            Err(e.into())
        }
    }
}

/// PUT /api/expenses/{id} (multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<Expense>>> {
    let repo = repo(&state);
    let existing = repo.find_by_id(&id).await?;

    let form = read_form(multipart).await?;
    let payload: ExpenseUpdate = match &form.data {
        Some(data) => serde_json::from_str(data)
            .map_err(|e| AppError::validation(format!("Invalid expense payload: {e}")))?,
        None => ExpenseUpdate::default(),
    };

    let mut updated = repo.update(&id, payload).await?;

    if !form.attachments.is_empty() {
        let store = UploadStore::new(state.uploads_dir());
        let paths = store_attachments(&store, &form.attachments)?;
        updated = repo.set_attachments(&id, paths).await?;
        for old in &existing.attachments {
            store.delete(old)?;
        }
    }
    Ok(ok(updated))
}

/// DELETE /api/expenses/{id} — 连同附件文件一起删除
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let deleted = repo(&state).delete(&id).await?;
    let store = UploadStore::new(state.uploads_dir());
    for path in &deleted.attachments {
        store.delete(path)?;
    }
    Ok(ok_with_message(deleted, "Expense deleted"))
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: i64,
    pub end: i64,
}

/// GET /api/expenses/range?start&end (Unix millis, 半开区间)
pub async fn in_range(
    State(state): State<ServerState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<AppResponse<Vec<Expense>>>> {
    if params.start >= params.end {
        return Err(AppError::validation("start must be before end"));
    }
    Ok(ok(repo(&state).find_in_range(params.start, params.end).await?))
}

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub year: i32,
    pub month: u32,
}

/// GET /api/expenses/summary/monthly?year&month
pub async fn monthly_summary(
    State(state): State<ServerState>,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<AppResponse<MonthlyExpenseSummary>>> {
    let summary = ReportsRepository::new(state.get_db())
        .monthly_expense_summary(params.year, params.month)
        .await?;
    Ok(ok(summary))
}

/// GET /api/expenses/summary/compare — 本月 vs 上月
pub async fn compare_months(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<MonthComparison>>> {
    let comparison = ReportsRepository::new(state.get_db())
        .month_comparison(now_millis())
        .await?;
    Ok(ok(comparison))
}
