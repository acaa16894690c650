//! Audio Output Port - 音频播放抽象
//!
//! 播放分为三步：prepare（解码为可播放资源）、play（播放到结束或被取消）、release（释放资源）

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Empty audio data")]
    EmptyAudio,

    #[error("Failed to decode audio: {0}")]
    DecodeError(String),

    #[error("Failed to start playback: {0}")]
    StartFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Unknown clip: {0}")]
    UnknownClip(u64),
}

/// 已准备好的音频资源句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u64);

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "clip-{}", self.0)
    }
}

/// 播放结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// 自然播放结束
    Completed,
    /// 被取消（停止播放并重置位置）
    Stopped,
}

/// Audio Output Port
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// 将音频字节解码为可播放资源
    async fn prepare(&self, audio: &[u8], mime_type: &str) -> Result<ClipId, PlaybackError>;

    /// 以指定倍速播放，直到结束或 `cancel` 被触发
    async fn play(
        &self,
        clip: ClipId,
        rate: f32,
        cancel: CancellationToken,
    ) -> Result<PlaybackEnd, PlaybackError>;

    /// 释放资源（幂等）
    async fn release(&self, clip: ClipId);
}
