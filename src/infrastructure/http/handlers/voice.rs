//! Voice HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::ListVoices;
use crate::infrastructure::http::dto::{ApiResponse, ListVoicesParams, VoiceListResponse};
use crate::infrastructure::http::state::AppState;

/// 列出可选音色
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVoicesParams>,
) -> Json<ApiResponse<VoiceListResponse>> {
    let voices = state.background.voices(ListVoices {
        language: params.language,
    });
    Json(ApiResponse::success(VoiceListResponse { voices }))
}
