//! Attribute API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{AttributeCreate, AttributeDefinition, AttributeUpdate};
use shared::{AttributeQuery, PaginatedResponse};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/attributes - 分页列表 (search/page/limit)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AttributeQuery>,
) -> AppResult<Json<PaginatedResponse<AttributeDefinition>>> {
    let page = state.attributes.list(&query).await?;
    Ok(Json(page))
}

/// GET /api/attributes/:id - 获取单个属性
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AttributeDefinition>> {
    let attr = state.attributes.get(id).await?;
    Ok(Json(attr))
}

/// POST /api/attributes - 创建属性
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AttributeCreate>,
) -> AppResult<Json<AttributeDefinition>> {
    let attr = state.attributes.create(payload).await?;
    Ok(Json(attr))
}

/// PUT /api/attributes/:id - 更新属性
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttributeUpdate>,
) -> AppResult<Json<AttributeDefinition>> {
    let attr = state.attributes.update(id, payload).await?;
    Ok(Json(attr))
}

/// DELETE /api/attributes/:id - 删除属性 (硬删除，级联绑定与商品值)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.attributes.delete(id).await?;
    Ok(Json(true))
}
