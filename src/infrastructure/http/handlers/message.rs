//! Message Handler - 任意协议消息的入口

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{Message, Reply};
use crate::infrastructure::http::state::AppState;

/// 投递一条协议消息并返回其回复
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<Message>,
) -> Json<Reply> {
    tracing::debug!(message = message.kind(), "Message received over HTTP");
    Json(state.background.dispatch(message).await)
}
