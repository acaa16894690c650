//! Settings HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::ReaderSettings;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 读取设置
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReaderSettings>>, ApiError> {
    let settings = state.background.settings()?;
    Ok(Json(ApiResponse::success(settings)))
}

/// 保存设置
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<ReaderSettings>,
) -> Result<Json<ApiResponse<ReaderSettings>>, ApiError> {
    let settings = state.background.update_settings(settings).await?;
    Ok(Json(ApiResponse::success(settings)))
}
