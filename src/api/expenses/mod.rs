//! 支出路由

mod handler;

use axum::Router;
use axum::routing::get;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/range", get(handler::in_range))
        .route("/summary/monthly", get(handler::monthly_summary))
        .route("/summary/compare", get(handler::compare_months))
        .route(
            "/{id}",
            get(handler::get_one)
                .put(handler::update)
                .delete(handler::remove),
        )
}
