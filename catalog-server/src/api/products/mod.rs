//! Product Attribute Value API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{id}/attributes",
            get(handler::get_values).put(handler::set_values),
        )
        .route("/{id}/attributes/display", get(handler::display_values))
}
