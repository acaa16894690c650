//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{DeliveryError, PlaybackError, StoreError, TtsError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 配置错误（如缺少凭证），立即上报，不重试
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 外部服务返回失败
    #[error("Service error: {0}")]
    ServiceError(String),

    /// 跨上下文消息投递失败
    #[error("Delivery error: {0}")]
    DeliveryError(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 播放错误
    #[error("Playback error: {0}")]
    PlaybackError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建投递错误
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::DeliveryError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 面向用户的错误信息
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError(msg)
            | Self::ServiceError(msg)
            | Self::DeliveryError(msg)
            | Self::ValidationError(msg)
            | Self::PlaybackError(msg)
            | Self::StorageError(msg)
            | Self::InternalError(msg) => msg.clone(),
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        if err.is_configuration() {
            Self::ConfigurationError(err.to_string())
        } else {
            Self::ServiceError(err.to_string())
        }
    }
}

impl From<DeliveryError> for ApplicationError {
    fn from(err: DeliveryError) -> Self {
        Self::DeliveryError(err.to_string())
    }
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        Self::PlaybackError(err.to_string())
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}
