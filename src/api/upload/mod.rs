//! 图片上传路由

mod handler;

use axum::Router;
use axum::routing::post;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/image", post(handler::upload_image))
}
