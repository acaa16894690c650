//! Application State

use std::sync::Arc;

use crate::application::BackgroundService;
use crate::infrastructure::bus::ChannelBus;
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    /// 后台上下文入口
    pub background: Arc<BackgroundService>,
    /// 到阅读器上下文的通道（选区上报）
    pub bus: Arc<ChannelBus>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        background: Arc<BackgroundService>,
        bus: Arc<ChannelBus>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            background,
            bus,
            event_publisher,
        }
    }
}
