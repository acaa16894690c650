//! Reader Channel Port - 到阅读器上下文的消息通道
//!
//! 对应浏览器扩展中 background → content script 的消息投递

use async_trait::async_trait;
use thiserror::Error;

use crate::application::messages::{Message, Reply};

/// 投递错误
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// 接收端未加载
    #[error("Reader context is not connected")]
    NotConnected,

    /// 接收端在回复前关闭
    #[error("Reader context dropped the request")]
    Dropped,

    #[error("Timed out waiting for reader reply after {0}ms")]
    Timeout(u64),

    #[error("Failed to inject reader context: {0}")]
    InjectFailed(String),
}

/// Reader Channel Port
#[async_trait]
pub trait ReaderChannelPort: Send + Sync {
    /// 发送消息并等待最多一个回复
    async fn send(&self, message: Message) -> Result<Reply, DeliveryError>;

    /// 加载（或重新加载）阅读器上下文
    async fn inject(&self) -> Result<(), DeliveryError>;
}
