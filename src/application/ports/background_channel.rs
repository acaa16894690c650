//! Background Channel Port - 阅读器到后台的消息通道

use async_trait::async_trait;

use crate::application::messages::{Message, Reply};

/// Background Channel Port
///
/// 后台总是给出回复，失败以 `Reply::failure` 表示
#[async_trait]
pub trait BackgroundChannelPort: Send + Sync {
    async fn send(&self, message: Message) -> Reply;
}
