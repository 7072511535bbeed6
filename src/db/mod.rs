//! Database Module
//!
//! 嵌入式 SurrealDB 存储：连接初始化、schema 定义

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "larder";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}

/// Apply idempotent schema definitions (unique indexes)
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_user_username ON TABLE user FIELDS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_staff_email ON TABLE staff FIELDS email UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}

/// Open a throwaway in-memory database (test helper)
#[cfg(test)]
pub async fn memory_db() -> Surreal<Db> {
    use surrealdb::engine::local::Mem;

    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .expect("select namespace");
    define_schema(&db).await.expect("define schema");
    db
}
