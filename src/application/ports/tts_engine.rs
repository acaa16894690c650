//! TTS Engine Port - 语音合成服务抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Language, SpeedSetting};

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    /// 未配置凭证，属于致命配置错误，不重试
    #[error("TTS API key not configured. Please set OUTLOUD_TTS__API_KEY")]
    MissingCredential,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("TTS API error: {status} - {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TtsError {
    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 音色 ID，None 时由适配器使用默认音色
    pub voice_id: Option<String>,
    pub speed: SpeedSetting,
    pub language: Language,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口：发送文本与音色/语速/语言，返回音频字节
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成语音，返回 MP3 音频数据
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError>;
}
