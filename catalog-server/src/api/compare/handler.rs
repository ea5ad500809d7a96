//! Compare API Handlers

use axum::{Json, extract::State};
use shared::models::{CompareRequest, CompareTable};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/compare - 商品对比表
pub async fn compare(
    State(state): State<ServerState>,
    Json(payload): Json<CompareRequest>,
) -> AppResult<Json<CompareTable>> {
    Ok(Json(state.compare.compare(&payload.product_ids).await?))
}
