//! Larder Server - 餐厅库存与销售管理后端
//!
//! # 架构概述
//!
//! 本模块是 Larder Server 的主入口，提供以下核心功能：
//!
//! - **商品目录** (`api/products`, `api/categories`): 商品、分类 CRUD
//! - **下单处理** (`orders`): 库存校验 + 原子扣减 + 订单落库
//! - **库存管理** (`api/inventory`): 后厨物料 CRUD 与低库存查询
//! - **支出管理** (`api/expenses`): 支出记录与附件上传
//! - **数据看板** (`api/dashboard`): 聚合统计
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repository)
//! ├── orders/        # 下单流程
//! ├── services/      # 定时库存清零、文件存储
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderProcessor;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __                   __
   / /   ____ __________/ /__  _____
  / /   / __ `/ ___/ __  / _ \/ ___/
 / /___/ /_/ / /  / /_/ /  __/ /
/_____/\__,_/_/   \__,_/\___/_/
    "#
    );
}
