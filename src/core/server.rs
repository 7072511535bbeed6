//! HTTP 服务器
//!
//! 组装路由、中间件，绑定端口并处理优雅退出。

use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::config::Config;
use super::state::ServerState;
use crate::auth::require_auth;
use crate::utils::{AppError, AppResult};

/// 同时在途请求上限
const MAX_IN_FLIGHT_REQUESTS: usize = 1024;

pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// 绑定端口并运行直到 Ctrl-C
    pub async fn run(self) -> AppResult<()> {
        let tasks = self.state.start_background_tasks();
        let app = build_app(self.state.clone());

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!(addr = %addr, environment = %self.config.environment, "Server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}

/// 组装完整应用：API 路由 + 静态上传目录 + 中间件栈
pub fn build_app(state: ServerState) -> Router {
    let uploads_dir = state.uploads_dir();

    Router::new()
        .merge(crate::api::router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .with_state(state)
}

/// HTTP 访问日志
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();
    if status.is_server_error() {
        tracing::error!(%method, %path, %status, ?elapsed, "Request failed");
    } else {
        tracing::info!(%method, %path, %status, ?elapsed, "Request");
    }
    response
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::UserRole;
    use crate::db::repository::UserRepository;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use tower::ServiceExt;

    async fn test_app(work_dir: &std::path::Path) -> Router {
        let db = memory_db().await;
        UserRepository::new(db.clone())
            .create("admin", "Administrator", None, "admin", UserRole::Admin)
            .await
            .unwrap();
        let config = Config::with_overrides(work_dir.to_str().unwrap(), 0);
        build_app(ServerState::with_db(config, db))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let response = app
            .oneshot(axum::http::Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let response = app
            .oneshot(axum::http::Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "E3001");
    }

    #[tokio::test]
    async fn login_then_access_protected_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let login = app
            .clone()
            .oneshot(
                axum::http::Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"admin","password":"admin"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let body = body_json(login).await;
        assert_eq!(body["code"], "E0000");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                axum::http::Request::get("/api/products")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["code"], "E0000");
    }

    #[tokio::test]
    async fn wrong_password_gets_unified_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let response = app
            .oneshot(
                axum::http::Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"admin","password":"nope"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid username or password");
    }
}
