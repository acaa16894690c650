//! Translator Port - 机器翻译抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Language;

/// 翻译错误
///
/// 只在适配器内部使用，对外统一回退为原文
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Translation API error: {0}")]
    ServiceError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Translator Port
#[async_trait]
pub trait TranslatorPort: Send + Sync {
    /// 翻译文本
    ///
    /// 任何失败都返回原文，不向调用方传播错误
    async fn translate(&self, text: &str, source: Language, target: Language) -> String;
}
