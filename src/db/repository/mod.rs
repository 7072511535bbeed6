//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 字符串格式。记录间引用也以该字符串
//! 形式存储，查询时按字符串比较或重新 parse 为 RecordId。

// Auth
pub mod user;

// Catalog Domain
pub mod category;
pub mod chef;
pub mod product;
pub mod supplier;

// Orders
pub mod order;

// Back of house
pub mod expense;
pub mod inventory;
pub mod staff;

// Aggregation
pub mod reports;

// Re-exports
pub use category::CategoryRepository;
pub use chef::ChefRepository;
pub use expense::ExpenseRepository;
pub use inventory::InventoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use reports::ReportsRepository;
pub use staff::StaffRepository;
pub use supplier::SupplierRepository;
pub use user::UserRepository;

use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as plain query errors
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an API-supplied id into a RecordId for the given table
///
/// Accepts "table:id" as well as the bare key part.
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let full = if id.contains(':') {
        id.to_string()
    } else {
        format!("{table}:{id}")
    };
    let record: RecordId = full
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid id: {id}")))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected a {table} id, got: {id}"
        )));
    }
    Ok(record)
}

/// Serialize an update payload for MERGE, dropping null (unset) fields
pub fn merge_value<T: Serialize>(data: &T) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(data)
        .map_err(|e| RepoError::Validation(format!("Invalid payload: {e}")))?;
    if let Some(map) = value.as_object_mut() {
        map.retain(|_, v| !v.is_null());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_both_forms() {
        assert_eq!(
            parse_id("product", "abc").unwrap().to_string(),
            "product:abc"
        );
        assert_eq!(
            parse_id("product", "product:abc").unwrap().to_string(),
            "product:abc"
        );
    }

    #[test]
    fn parse_id_rejects_wrong_table() {
        assert!(parse_id("product", "category:abc").is_err());
    }

    #[test]
    fn merge_value_drops_unset_fields() {
        #[derive(Serialize)]
        struct Patch {
            name: Option<String>,
            stock: Option<i64>,
        }
        let v = merge_value(&Patch {
            name: Some("Rice".into()),
            stock: None,
        })
        .unwrap();
        let map = v.as_object().unwrap();
        assert!(map.contains_key("name"));
        assert!(!map.contains_key("stock"));
    }
}
