//! 阅读器投递
//!
//! 向阅读器上下文发送消息：先确认就绪（必要时重新加载），再按固定间隔有限次重试。
//!
//! 链路同时维护播放代数：每次 STOP 或新的朗读请求都会使之前的请求过期，
//! 过期请求的合成结果不再投递给阅读器。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::messages::{Message, Reply};
use crate::application::ports::{DeliveryError, ReaderChannelPort};

/// 投递重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大发送次数
    pub max_attempts: u32,
    /// 两次发送之间的固定间隔
    pub retry_delay: Duration,
    /// 重新加载后等待初始化的时间
    pub inject_settle: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            inject_settle: Duration::from_millis(100),
        }
    }
}

/// 阅读器链路
pub struct ReaderLink {
    channel: Arc<dyn ReaderChannelPort>,
    policy: RetryPolicy,
    generation: AtomicU64,
}

impl ReaderLink {
    pub fn new(channel: Arc<dyn ReaderChannelPort>, policy: RetryPolicy) -> Self {
        Self {
            channel,
            policy,
            generation: AtomicU64::new(0),
        }
    }

    /// 开始一次新的朗读请求，之前的请求随之过期；返回本次请求的代数
    pub fn begin_playback(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 使所有进行中的朗读请求过期
    pub fn invalidate_playback(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// 该代数的请求是否仍是最新的
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// 确认阅读器就绪：探测失败时重新加载，等待初始化后再探测一次
    pub async fn ensure_ready(&self) -> bool {
        if self.channel.send(Message::Ping).await.is_ok() {
            return true;
        }

        tracing::info!("Reader not ready, attempting to inject");
        if let Err(e) = self.channel.inject().await {
            tracing::error!(error = %e, "Failed to inject reader");
            return false;
        }

        tokio::time::sleep(self.policy.inject_settle).await;
        let ready = self.channel.send(Message::Ping).await.is_ok();
        if !ready {
            tracing::warn!("Reader injected but still not responding");
        }
        ready
    }

    /// 投递消息（带就绪检查与有限重试）
    pub async fn deliver(&self, message: Message) -> Result<Reply, DeliveryError> {
        let kind = message.kind();

        if !self.ensure_ready().await {
            return Err(DeliveryError::NotConnected);
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = DeliveryError::NotConnected;

        for attempt in 1..=max_attempts {
            tracing::debug!(message = kind, attempt, max_attempts, "Delivering to reader");

            match self.channel.send(message.clone()).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    tracing::warn!(message = kind, attempt, error = %e, "Delivery attempt failed");
                    last_error = e;
                }
            }

            if attempt < max_attempts {
                self.ensure_ready().await;
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        tracing::error!(message = kind, attempts = max_attempts, "Giving up delivery");
        Err(last_error)
    }
}
