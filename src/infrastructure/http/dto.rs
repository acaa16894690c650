//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::{Language, VoiceInfo};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式，与消息回复同形：`{ success, error?, data? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }
}

// ============================================================================
// Selection DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakSelectedResponse {
    pub text: String,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListVoicesParams {
    pub language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceInfo>,
}
