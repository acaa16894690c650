//! 跨上下文消息协议
//!
//! 每个请求最多对应一个回复。消息 JSON 以 `type` 字段区分（SCREAMING_SNAKE_CASE）。

use serde::{Deserialize, Serialize};

use crate::domain::{Language, ReaderSettings, SpeedSetting, VoiceInfo};

/// MP3 音频 MIME 类型
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// 消息的处理方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 后台上下文（网关、缓存、设置）
    Background,
    /// 阅读器上下文（选区、播放、浮层）
    Reader,
}

/// SPEAK_TEXT 的可选参数，缺省时使用已保存的设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeakOptions {
    pub voice: Option<String>,
    pub speed: Option<SpeedSetting>,
    pub language: Option<Language>,
}

/// 跨上下文消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// 合成并播放一段文本
    SpeakText {
        text: String,
        #[serde(default)]
        options: SpeakOptions,
    },
    StopSpeaking,
    /// 阅读器完成选区差分后请求后台合成/翻译
    #[serde(rename_all = "camelCase")]
    ProcessSelectionChange {
        delta_text: String,
        full_text: String,
        shrink: bool,
        language: Language,
        #[serde(default)]
        voice: Option<String>,
        #[serde(default)]
        speed: SpeedSetting,
    },
    #[serde(rename_all = "camelCase")]
    PlayAudio {
        #[serde(with = "base64_audio")]
        audio_data: Vec<u8>,
        mime_type: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayDifferenceAndFull {
        #[serde(with = "base64_audio")]
        delta_audio: Vec<u8>,
        #[serde(with = "base64_audio")]
        full_audio: Vec<u8>,
        same_content: bool,
    },
    StopAudio,
    /// 就绪探测
    Ping,
    GetSelection,
    GetVoices,
    UpdateSettings {
        settings: ReaderSettings,
    },
    UpdateAutoReadSettings {
        settings: ReaderSettings,
    },
    ShowTranslationOverlay {
        original: String,
        translation: String,
    },
}

impl Message {
    /// 消息类型名（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SpeakText { .. } => "SPEAK_TEXT",
            Self::StopSpeaking => "STOP_SPEAKING",
            Self::ProcessSelectionChange { .. } => "PROCESS_SELECTION_CHANGE",
            Self::PlayAudio { .. } => "PLAY_AUDIO",
            Self::PlayDifferenceAndFull { .. } => "PLAY_DIFFERENCE_AND_FULL",
            Self::StopAudio => "STOP_AUDIO",
            Self::Ping => "PING",
            Self::GetSelection => "GET_SELECTION",
            Self::GetVoices => "GET_VOICES",
            Self::UpdateSettings { .. } => "UPDATE_SETTINGS",
            Self::UpdateAutoReadSettings { .. } => "UPDATE_AUTO_READ_SETTINGS",
            Self::ShowTranslationOverlay { .. } => "SHOW_TRANSLATION_OVERLAY",
        }
    }

    /// 消息应由哪个上下文处理
    pub fn target(&self) -> Target {
        match self {
            Self::SpeakText { .. }
            | Self::StopSpeaking
            | Self::ProcessSelectionChange { .. }
            | Self::UpdateSettings { .. } => Target::Background,
            Self::PlayAudio { .. }
            | Self::PlayDifferenceAndFull { .. }
            | Self::StopAudio
            | Self::Ping
            | Self::GetSelection
            | Self::GetVoices
            | Self::UpdateAutoReadSettings { .. }
            | Self::ShowTranslationOverlay { .. } => Target::Reader,
        }
    }
}

/// 回复附带的数据
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    Ready { ready: bool },
    Selection { text: String },
    Voices { voices: Vec<VoiceInfo> },
    Settings { settings: ReaderSettings },
}

/// 统一回复：布尔成功标志 + 可读错误信息
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ReplyPayload>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            payload: None,
        }
    }

    pub fn with_payload(payload: ReplyPayload) -> Self {
        Self {
            success: true,
            error: None,
            payload: Some(payload),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            payload: None,
        }
    }

    pub fn ready() -> Self {
        Self::with_payload(ReplyPayload::Ready { ready: true })
    }

    /// GET_SELECTION 回复中的文本
    pub fn selection_text(&self) -> Option<&str> {
        match &self.payload {
            Some(ReplyPayload::Selection { text }) => Some(text),
            _ => None,
        }
    }
}

/// 音频字节以 base64 字符串传输
mod base64_audio {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
