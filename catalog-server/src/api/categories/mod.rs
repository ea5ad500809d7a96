//! Category API 模块
//!
//! 分类本身由外部维护，这里只暴露路径、属性绑定与有效 schema。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/path", get(handler::path))
        .route(
            "/{id}/attributes",
            get(handler::effective_bindings).put(handler::set_bindings),
        )
        .route("/{id}/attributes/direct", get(handler::direct_bindings))
        .route("/{id}/schema", get(handler::schema))
        .route("/{id}/filters", get(handler::filters))
}
