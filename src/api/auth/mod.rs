//! 认证路由

mod handler;

use axum::Router;
use axum::routing::{get, post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
