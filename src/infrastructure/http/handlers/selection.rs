//! Selection HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{
    ApiResponse, Empty, SelectionRequest, SpeakSelectedResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上报页面上观测到的选区
pub async fn observe_selection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.bus.observe_selection(req.text).await?;
    Ok(Json(ApiResponse::ok()))
}

/// 朗读选中文本
pub async fn speak_selected(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SpeakSelectedResponse>>, ApiError> {
    let text = state.background.speak_selected().await?;
    Ok(Json(ApiResponse::success(SpeakSelectedResponse { text })))
}
