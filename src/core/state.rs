//! 服务器共享状态
//!
//! 数据库句柄、JWT 服务与配置，Clone 后在各 handler 间共享。

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::config::Config;
use super::tasks::{BackgroundTasks, TaskKind};
use crate::auth::JwtService;
use crate::db::models::UserRole;
use crate::db::repository::UserRepository;
use crate::db::DbService;
use crate::services::stock_reset;
use crate::utils::{AppError, AppResult};

/// 全局共享状态
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化：建目录、开库、种子管理员
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work dirs: {e}")))?;

        let db_path = config.database_dir();
        let db_path = db_path
            .to_str()
            .ok_or_else(|| AppError::internal("Non-UTF8 database path"))?;
        let db_service = DbService::new(db_path).await?;

        let state = Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
            db: db_service.db,
            config: Arc::new(config),
        };
        state.seed_admin().await?;
        Ok(state)
    }

    /// 供测试注入内存库
    #[cfg(test)]
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
            db,
            config: Arc::new(config),
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn uploads_dir(&self) -> std::path::PathBuf {
        self.config.uploads_dir()
    }

    /// 首次启动时创建 admin 账号
    async fn seed_admin(&self) -> AppResult<()> {
        let users = UserRepository::new(self.get_db());
        if users.count().await.map_err(AppError::from)? > 0 {
            return Ok(());
        }
        users
            .create(
                "admin",
                "Administrator",
                None,
                &self.config.admin_bootstrap_password,
                UserRole::Admin,
            )
            .await
            .map_err(AppError::from)?;
        tracing::info!("Seeded initial admin user");
        Ok(())
    }

    /// 启动后台任务
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let token = tasks.shutdown_token();
        let db = self.get_db();
        let interval_hours = self.config.stock_reset_interval_hours;
        tasks.spawn("stock_reset", TaskKind::Periodic, async move {
            stock_reset::run(db, interval_hours, token).await;
        });

        tasks.log_summary();
        tasks
    }
}
