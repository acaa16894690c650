//! Event Publisher Implementation
//!
//! 翻译浮层事件通过 WebSocket 推送给页面端

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::OverlayPort;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 显示翻译浮层（替换已有浮层）
    TranslationOverlay {
        original: String,
        translation: String,
        shown_at: DateTime<Utc>,
    },
    /// 浮层关闭
    OverlayDismissed,
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<WsEvent>,
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.channel.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.channel.receiver_count()
    }

    fn publish(&self, event: WsEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl OverlayPort for EventPublisher {
    fn show(&self, original: &str, translation: &str) {
        tracing::debug!(
            original_len = original.len(),
            translation_len = translation.len(),
            "Showing translation overlay"
        );
        self.publish(WsEvent::TranslationOverlay {
            original: original.to_string(),
            translation: translation.to_string(),
            shown_at: Utc::now(),
        });
    }

    fn dismiss(&self) {
        self.publish(WsEvent::OverlayDismissed);
    }
}
