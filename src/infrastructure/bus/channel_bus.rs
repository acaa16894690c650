//! Channel Bus - 后台到阅读器的进程内消息通道
//!
//! 请求经 mpsc 投入阅读器收件箱，回复经 oneshot 返回，每个请求都有超时。
//! 阅读器由启动器创建，inject 时（重新）启动。

use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::application::messages::{Message, Reply};
use crate::application::ports::{DeliveryError, ReaderChannelPort};
use crate::infrastructure::worker::{Envelope, ReaderInput};

/// 阅读器启动器：启动一个新的阅读器并返回其收件箱
pub type ReaderLauncher =
    Box<dyn Fn() -> Result<mpsc::Sender<ReaderInput>, String> + Send + Sync>;

/// 进程内消息通道
pub struct ChannelBus {
    sender: RwLock<Option<mpsc::Sender<ReaderInput>>>,
    launcher: OnceLock<ReaderLauncher>,
    timeout: Duration,
}

impl ChannelBus {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sender: RwLock::new(None),
            launcher: OnceLock::new(),
            timeout,
        }
    }

    /// 安装阅读器启动器，只能安装一次
    pub fn install_launcher(&self, launcher: ReaderLauncher) -> bool {
        self.launcher.set(launcher).is_ok()
    }

    /// 直接接入一个已存在的阅读器收件箱
    pub fn connect(&self, sender: mpsc::Sender<ReaderInput>) {
        let mut slot = self
            .sender
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(sender);
    }

    pub fn is_connected(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<mpsc::Sender<ReaderInput>> {
        self.sender
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .filter(|sender| !sender.is_closed())
            .cloned()
    }

    /// 上报页面选区；阅读器未加载时先加载
    pub async fn observe_selection(&self, text: String) -> Result<(), DeliveryError> {
        if !self.is_connected() {
            self.inject().await?;
        }
        let sender = self.current().ok_or(DeliveryError::NotConnected)?;
        sender
            .send(ReaderInput::SelectionObserved(text))
            .await
            .map_err(|_| DeliveryError::NotConnected)
    }
}

#[async_trait]
impl ReaderChannelPort for ChannelBus {
    async fn send(&self, message: Message) -> Result<Reply, DeliveryError> {
        let sender = self.current().ok_or(DeliveryError::NotConnected)?;
        let (reply_tx, reply_rx) = oneshot::channel();

        sender
            .send(ReaderInput::Request(Envelope {
                message,
                reply: reply_tx,
            }))
            .await
            .map_err(|_| DeliveryError::NotConnected)?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(DeliveryError::Dropped),
            Err(_) => Err(DeliveryError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    async fn inject(&self) -> Result<(), DeliveryError> {
        let launcher = self
            .launcher
            .get()
            .ok_or_else(|| DeliveryError::InjectFailed("no reader launcher installed".to_string()))?;

        let sender = launcher().map_err(DeliveryError::InjectFailed)?;
        self.connect(sender);

        tracing::info!("Reader context injected");
        Ok(())
    }
}
