//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    BindingInput, BindingView, CategoryPathEntry, EffectiveBindings, EffectiveSchema,
    ReplaceSummary,
};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/categories/:id/path - 祖先路径
pub async fn path(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CategoryPathEntry>>> {
    Ok(Json(state.bindings.get_path(id).await?))
}

/// GET /api/categories/:id/attributes - 直接 + 继承绑定
pub async fn effective_bindings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EffectiveBindings>> {
    Ok(Json(state.bindings.get_effective_bindings(id).await?))
}

/// GET /api/categories/:id/attributes/direct - 仅直接绑定
pub async fn direct_bindings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<BindingView>>> {
    Ok(Json(state.bindings.get_direct_bindings(id).await?))
}

/// PUT /api/categories/:id/attributes - 全量替换直接绑定
pub async fn set_bindings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<BindingInput>>,
) -> AppResult<Json<ReplaceSummary>> {
    Ok(Json(state.bindings.set_bindings(id, payload).await?))
}

/// GET /api/categories/:id/schema - 有效属性 schema
pub async fn schema(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EffectiveSchema>> {
    Ok(Json(state.schema.get_effective_attribute_schema(id).await?))
}

/// GET /api/categories/:id/filters - 可筛选属性
pub async fn filters(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EffectiveSchema>> {
    Ok(Json(state.schema.get_filterable_attributes(id).await?))
}
