//! API Module
//!
//! REST 路由。每个资源一个子模块：mod.rs 声明路由，
//! handler.rs 实现处理器。除 /health 与 /api/auth/login 外
//! 均要求认证 (见 auth::middleware)。

pub mod auth;
pub mod categories;
pub mod chefs;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod staff;
pub mod suppliers;
pub mod upload;

use axum::Router;

use crate::core::ServerState;

/// 汇总全部资源路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/products", products::router())
        .nest("/api/categories", categories::router())
        .nest("/api/chefs", chefs::router())
        .nest("/api/suppliers", suppliers::router())
        .nest("/api/inventory", inventory::router())
        .nest("/api/expenses", expenses::router())
        .nest("/api/staff", staff::router())
        .nest("/api/orders", orders::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/upload", upload::router())
}
