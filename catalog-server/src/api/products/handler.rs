//! Product Attribute Value API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{AttributeValueRecord, ProductDisplayValues, ReplaceSummary};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/products/:id/attributes - 已存储的属性值
pub async fn get_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<AttributeValueRecord>>> {
    Ok(Json(state.values.get_values(id).await?))
}

/// PUT /api/products/:id/attributes - 全量替换属性值
pub async fn set_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<AttributeValueRecord>>,
) -> AppResult<Json<ReplaceSummary>> {
    Ok(Json(state.values.set_values(id, payload).await?))
}

/// GET /api/products/:id/attributes/display - 格式化后的属性值
pub async fn display_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDisplayValues>> {
    Ok(Json(state.values.get_display_values(id).await?))
}
