//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping            GET   健康检查（含阅读器连接状态）
//! - /api/message         POST  投递任意协议消息，返回其回复
//! - /api/selection       POST  上报页面选区
//! - /api/speak_selected  POST  朗读选中文本
//! - /api/voices          GET   列出音色（可按 language 过滤）
//! - /api/settings        GET   读取设置
//! - /api/settings        POST  保存设置
//! - /ws/events           WS    翻译浮层事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/message", post(handlers::post_message))
        .route("/selection", post(handlers::observe_selection))
        .route("/speak_selected", post(handlers::speak_selected))
        .route("/voices", get(handlers::list_voices))
        .route(
            "/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    use crate::application::testing::{fast_link, speech_with, MemoryStore};
    use crate::application::{BackgroundService, Message, Reply, ReplyPayload};
    use crate::infrastructure::adapters::FakeTtsClient;
    use crate::infrastructure::bus::ChannelBus;
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::worker::ReaderInput;

    /// 页面选区固定为"你好"的阅读器
    fn spawn_page_reader() -> mpsc::Sender<ReaderInput> {
        let (tx, mut rx) = mpsc::channel::<ReaderInput>(8);
        tokio::spawn(async move {
            while let Some(input) = rx.recv().await {
                if let ReaderInput::Request(envelope) = input {
                    let reply = match envelope.message {
                        Message::Ping => Reply::ready(),
                        Message::GetSelection => Reply::with_payload(ReplyPayload::Selection {
                            text: "你好".to_string(),
                        }),
                        _ => Reply::ok(),
                    };
                    let _ = envelope.reply.send(reply);
                }
            }
        });
        tx
    }

    fn app() -> Router {
        let bus = Arc::new(ChannelBus::new(Duration::from_millis(200)));
        bus.install_launcher(Box::new(|| Ok(spawn_page_reader())));

        let tts = Arc::new(FakeTtsClient::from_bytes(vec![1, 2, 3]));
        let background = Arc::new(BackgroundService::new(
            speech_with(tts),
            Arc::new(MemoryStore::default()),
            fast_link(bus.clone()),
        ));
        let state = AppState::new(background, bus, Arc::new(EventPublisher::new()));

        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_ping() {
        let (status, body) = call(app(), "GET", "/api/ping", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["reader_connected"], false);
    }

    #[tokio::test]
    async fn test_message_ping_reaches_reader() {
        let (status, body) = call(app(), "POST", "/api/message", Some(json!({"type": "PING"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["payload"]["ready"], true);
    }

    #[tokio::test]
    async fn test_message_speak_text() {
        let (_, body) = call(
            app(),
            "POST",
            "/api/message",
            Some(json!({"type": "SPEAK_TEXT", "text": "你好"})),
        )
        .await;
        assert_eq!(body["success"], true);

        let (_, body) = call(
            app(),
            "POST",
            "/api/message",
            Some(json!({"type": "SPEAK_TEXT", "text": "  "})),
        )
        .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_unknown_message_type_is_rejected() {
        let (status, _) = call(app(), "POST", "/api/message", Some(json!({"type": "NOPE"}))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_speak_selected_uses_page_selection() {
        let (_, body) = call(app(), "POST", "/api/speak_selected", None).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["text"], "你好");
    }

    #[tokio::test]
    async fn test_observe_selection() {
        let (_, body) = call(app(), "POST", "/api/selection", Some(json!({"text": "你好"}))).await;
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_list_voices_by_language() {
        let (_, body) = call(app(), "GET", "/api/voices?language=zh", None).await;
        let voices = body["data"]["voices"].as_array().unwrap();
        assert!(!voices.is_empty());
        assert!(voices.iter().all(|v| v["language"] == "zh"));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let app = app();

        let (_, body) = call(app.clone(), "GET", "/api/settings", None).await;
        assert_eq!(body["data"]["speed"], "normal");
        assert_eq!(body["data"]["autoRead"], false);

        let (_, body) = call(
            app.clone(),
            "POST",
            "/api/settings",
            Some(json!({"speed": "fast", "autoRead": true})),
        )
        .await;
        assert_eq!(body["success"], true);

        let (_, body) = call(app, "GET", "/api/settings", None).await;
        assert_eq!(body["data"]["speed"], "fast");
        assert_eq!(body["data"]["autoRead"], true);
        assert_eq!(body["data"]["languageDetection"], "auto");
    }
}
